//! # SABAKO Site
//!
//! Server core of the SABAKO agency site: paginated blog and portfolio
//! listings, the contact pipeline and consent-aware analytics.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Slug cursors over the full ordered collection, page size capped at 30
//! - **Content Providers**: Embedded collections or WordPress over GraphQL, failing open
//! - **Infinite Scroll**: Visibility trigger and paging sessions that discard stale responses
//! - **Contact Pipeline**: Validation, persistence and queued webhook notifications
//! - **Analytics**: Consent-gated and cookieless event sinks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sabako_site::content::{load_page, ContentSources};
//! use sabako_site::pagination::PageRequest;
//!
//! #[tokio::main]
//! async fn main() -> sabako_site::Result<()> {
//!     let sources = ContentSources::mock()?;
//!
//!     let first = load_page(sources.posts.as_ref(), &PageRequest::new(6)).await?;
//!     let next = PageRequest::new(6).after_opt(first.end_cursor.clone());
//!     let second = load_page(sources.posts.as_ref(), &next).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        HTTP API (axum)                          │
//! │  /api/posts   /api/works   /api/works/featured   /api/contact   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────┬─────────────┬───────────┐
//! │   Content    │      Pagination       │   Contact   │ Analytics │
//! ├──────────────┼───────────────────────┼─────────────┼───────────┤
//! │ Mock         │ Slug cursors          │ Validate    │ Consent   │
//! │ WordPress    │ Clamp to 30           │ Store       │ Sinks     │
//! │ Fail-open    │ Paging sessions       │ Notify      │ Clicks    │
//! └──────────────┴───────────────────────┴─────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the site service
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Content types and providers
pub mod content;

/// WordPress GraphQL source
pub mod graphql;

/// Service settings
pub mod config;

/// Infinite scroll trigger and paging sessions
pub mod scroll;

/// Contact form pipeline
pub mod contact;

/// Consent and analytics events
pub mod analytics;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use content::{BlogPost, ContentProvider, ContentSources, WorkItem};
pub use pagination::{paginate, Connection, Page, PageInfo, PageRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
