//! Content module
//!
//! Canonical blog and work types, the provider contract, the embedded mock
//! collections, the fail-open wrapper and the homepage spotlight banners.
//!
//! # Overview
//!
//! A provider always hands back the complete ordered collection; the
//! [`pagination`](crate::pagination) module cuts pages from it. Which provider
//! backs each collection, and what it degrades to when the CMS is down, is
//! decided once at startup by [`ContentSources::from_settings`].

pub(crate) mod mock;
mod provider;
mod spotlight;
mod types;

pub(crate) use mock::filter_items;
pub use mock::{mock_posts, mock_works, StaticProvider, MOCK_POSTS_YAML, MOCK_WORKS_YAML};
pub use provider::{featured_works, load_page, ContentProvider, FailOpen, UpstreamFailure};
pub use spotlight::{
    Clock, Spotlight, SpotlightSet, SpotlightSlot, Spotlights, MOCK_SPOTLIGHTS_YAML,
};
pub use types::{matches_classification, BlogPost, ContentItem, WorkItem, WorkType};

use crate::config::{ContentSettings, HttpSettings};
use crate::error::Result;
use crate::graphql::{GraphQlClient, WordPressSource};
use crate::http::HttpClient;
use std::sync::Arc;
use tracing::info;

/// The providers behind the two listings, plus the spotlight banners
#[derive(Clone)]
pub struct ContentSources {
    pub posts: Arc<dyn ContentProvider<BlogPost>>,
    pub works: Arc<dyn ContentProvider<WorkItem>>,
    pub spotlights: Spotlights,
}

impl ContentSources {
    /// Serve the embedded mock content
    pub fn mock() -> Result<Self> {
        Ok(Self {
            posts: Arc::new(StaticProvider::posts()?),
            works: Arc::new(StaticProvider::works()?),
            spotlights: Spotlights::mock()?,
        })
    }

    /// Pick providers from settings
    pub fn from_settings(content: &ContentSettings, http: &HttpSettings) -> Result<Self> {
        let Some(endpoint) = &content.graphql_url else {
            info!("no CMS endpoint configured, serving embedded content");
            return Self::mock();
        };

        let config = match &content.auth_token {
            Some(token) => http.client_config().with_bearer_token(token),
            None => http.client_config(),
        };
        let client = GraphQlClient::new(Arc::new(HttpClient::with_config(config)?), endpoint.clone());
        let source = Arc::new(
            WordPressSource::new(client)
                .batch_size(content.batch_size)
                .max_pages(content.max_pages),
        );

        info!(
            endpoint = %endpoint,
            posts_on_failure = ?content.posts_on_failure,
            works_on_failure = ?content.works_on_failure,
            "serving content from WordPress"
        );

        let posts: Arc<dyn ContentProvider<BlogPost>> = source.clone();
        let works: Arc<dyn ContentProvider<WorkItem>> = source;
        Ok(Self {
            posts: degrade(posts, content.posts_on_failure, mock_posts)?,
            works: degrade(works, content.works_on_failure, mock_works)?,
            spotlights: Spotlights::mock()?,
        })
    }
}

/// Wrap `inner` according to the failure policy
fn degrade<T: ContentItem>(
    inner: Arc<dyn ContentProvider<T>>,
    policy: UpstreamFailure,
    mock: fn() -> Result<Vec<T>>,
) -> Result<Arc<dyn ContentProvider<T>>> {
    Ok(match policy {
        UpstreamFailure::Empty => Arc::new(FailOpen::empty(inner)),
        UpstreamFailure::Mock => Arc::new(FailOpen::with_fallback(inner, mock()?)),
        UpstreamFailure::Error => inner,
    })
}
