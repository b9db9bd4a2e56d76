//! CLI module
//!
//! Command-line interface for running the site service.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `posts` / `works` - Walk a running server's listing page by page
//! - `consent` - Show or change the stored analytics consent
//! - `check-config` - Validate and print the effective settings

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, WalkArgs};
pub use runner::{Runner, LOAD_MORE_EVENT};
pub use server::{router, serve, AppState, DEFAULT_FEATURED_LIMIT};
