//! Built-in mock content embedded in the binary
//!
//! Served when no CMS endpoint is configured, and as the fallback
//! collection for the works listing when the CMS is unreachable.

use super::types::{BlogPost, ContentItem, WorkItem};
use super::provider::ContentProvider;
use crate::content::matches_classification;
use crate::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Embedded blog posts, newest first
pub const MOCK_POSTS_YAML: &str = include_str!("../../data/posts.yaml");

/// Embedded portfolio works
pub const MOCK_WORKS_YAML: &str = include_str!("../../data/works.yaml");

/// Parse the embedded blog posts
pub fn mock_posts() -> Result<Vec<BlogPost>> {
    parse(MOCK_POSTS_YAML)
}

/// Parse the embedded works
pub fn mock_works() -> Result<Vec<WorkItem>> {
    parse(MOCK_WORKS_YAML)
}

fn parse<T: DeserializeOwned>(yaml: &str) -> Result<Vec<T>> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Provider over a fixed in-memory collection
#[derive(Debug, Clone)]
pub struct StaticProvider<T> {
    items: Arc<Vec<T>>,
}

impl<T: ContentItem> StaticProvider<T> {
    /// Serve exactly these items in this order
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl StaticProvider<BlogPost> {
    /// Provider over the embedded blog posts
    pub fn posts() -> Result<Self> {
        Ok(Self::new(mock_posts()?))
    }
}

impl StaticProvider<WorkItem> {
    /// Provider over the embedded works
    pub fn works() -> Result<Self> {
        Ok(Self::new(mock_works()?))
    }
}

#[async_trait]
impl<T: ContentItem> ContentProvider<T> for StaticProvider<T> {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<T>> {
        Ok(filter_items(&self.items, filter))
    }
}

/// Apply an optional classification filter, preserving order
pub(crate) fn filter_items<T: ContentItem>(items: &[T], filter: Option<&str>) -> Vec<T> {
    match filter {
        Some(filter) => items
            .iter()
            .filter(|item| matches_classification(*item, filter))
            .cloned()
            .collect(),
        None => items.to_vec(),
    }
}
