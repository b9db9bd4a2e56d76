//! Content provider contract and the fail-open wrapper

use super::mock::filter_items;
use super::types::{ContentItem, WorkItem};
use crate::error::Result;
use crate::pagination::{paginate, Page, PageRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Supplies the complete ordered collection of one content kind.
///
/// Providers never paginate; that is the paginator's job.
#[async_trait]
pub trait ContentProvider<T: ContentItem>: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Full ordered collection, optionally restricted to one category/type
    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<T>>;

    /// Single item by slug
    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<T>> {
        let items = self.fetch_all(None).await?;
        Ok(items.into_iter().find(|item| item.slug() == slug))
    }
}

/// What a failing upstream degrades to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamFailure {
    /// Serve an empty collection
    #[default]
    Empty,
    /// Serve the built-in mock collection
    Mock,
    /// Surface the error (the listing route answers 502)
    Error,
}

/// Wraps a provider so upstream failures degrade instead of propagating
pub struct FailOpen<T: ContentItem> {
    inner: Arc<dyn ContentProvider<T>>,
    fallback: Arc<Vec<T>>,
}

impl<T: ContentItem> FailOpen<T> {
    /// Degrade to an empty collection
    pub fn empty(inner: Arc<dyn ContentProvider<T>>) -> Self {
        Self::with_fallback(inner, Vec::new())
    }

    /// Degrade to the given collection
    pub fn with_fallback(inner: Arc<dyn ContentProvider<T>>, fallback: Vec<T>) -> Self {
        Self {
            inner,
            fallback: Arc::new(fallback),
        }
    }
}

#[async_trait]
impl<T: ContentItem> ContentProvider<T> for FailOpen<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<T>> {
        match self.inner.fetch_all(filter).await {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(
                    source = self.inner.name(),
                    fallback_items = self.fallback.len(),
                    "content fetch failed, serving fallback: {e}"
                );
                Ok(filter_items(&self.fallback, filter))
            }
        }
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<T>> {
        match self.inner.fetch_by_slug(slug).await {
            Ok(item) => Ok(item),
            Err(e) => {
                warn!(source = self.inner.name(), slug, "content lookup failed: {e}");
                Ok(self.fallback.iter().find(|item| item.slug() == slug).cloned())
            }
        }
    }
}

/// Fetch the collection fresh and cut the requested page from it
pub async fn load_page<T: ContentItem>(
    provider: &dyn ContentProvider<T>,
    request: &PageRequest,
) -> Result<Page<T>> {
    let all = provider.fetch_all(request.filter.as_deref()).await?;
    Ok(paginate(&all, request))
}

/// Featured works in collection order, optionally capped
pub fn featured_works(works: Vec<WorkItem>, limit: Option<usize>) -> Vec<WorkItem> {
    let featured = works.into_iter().filter(|w| w.featured);
    match limit {
        Some(limit) => featured.take(limit).collect(),
        None => featured.collect(),
    }
}
