//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SABAKO site service CLI
#[derive(Parser, Debug)]
#[command(name = "sabako-site")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// WordPress GraphQL endpoint (overrides settings and environment)
    #[arg(long, global = true)]
    pub graphql_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Walk a running server's blog listing page by page
    Posts(WalkArgs),

    /// Walk a running server's portfolio listing page by page
    Works(WalkArgs),

    /// Show or change the stored analytics consent
    Consent {
        /// Allow analytics
        #[arg(long, conflicts_with = "decline")]
        accept: bool,

        /// Opt out of analytics
        #[arg(long)]
        decline: bool,
    },

    /// Validate settings and print the effective configuration
    CheckConfig,
}

/// Options shared by the listing walkers
#[derive(clap::Args, Debug, Clone)]
pub struct WalkArgs {
    /// Server to read from
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    pub base_url: String,

    /// Page size (defaults to the listing's own default)
    #[arg(long)]
    pub first: Option<usize>,

    /// Category (posts) or type (works)
    #[arg(long)]
    pub filter: Option<String>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Print items as they arrive instead of one array at the end
    #[arg(long)]
    pub stream: bool,
}
