//! WordPress GraphQL content source
//!
//! Queries a WPGraphQL endpoint for posts and the `work` custom post type,
//! walks the remote cursor connection to the end, and normalizes every node
//! into the canonical [`BlogPost`](crate::content::BlogPost) and
//! [`WorkItem`](crate::content::WorkItem) shapes.

mod client;
pub mod normalize;
pub mod queries;
mod source;
pub mod types;

pub use client::GraphQlClient;
pub use normalize::{estimate_read_time, normalize_post, normalize_work, strip_html};
pub use source::{WordPressSource, DEFAULT_BATCH_SIZE, DEFAULT_MAX_PAGES};
