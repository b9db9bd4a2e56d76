//! WordPress content providers
//!
//! The remote connection is walked to exhaustion with [`PaginationState`] and
//! normalized; cursor pagination for the site's own listings then happens
//! locally over the full collection.

use super::client::GraphQlClient;
use super::normalize::{normalize_post, normalize_work};
use super::queries::{GET_POSTS, GET_POST_BY_SLUG, GET_WORKS, GET_WORK_BY_SLUG};
use super::types::{PostBySlugData, PostsData, WorkBySlugData, WorksData, WpConnection};
use crate::content::{filter_items, BlogPost, ContentItem, ContentProvider, WorkItem};
use crate::error::{Error, Result};
use crate::pagination::PaginationState;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Nodes requested per remote page
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Safety stop for the remote walk
pub const DEFAULT_MAX_PAGES: u32 = 20;

/// Posts and works from a WPGraphQL endpoint
#[derive(Debug, Clone)]
pub struct WordPressSource {
    client: GraphQlClient,
    batch_size: u32,
    max_pages: u32,
}

impl WordPressSource {
    pub fn new(client: GraphQlClient) -> Self {
        Self {
            client,
            batch_size: DEFAULT_BATCH_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    #[must_use]
    pub fn batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    async fn walk<D, N, F>(&self, query: &str, connection: F) -> Result<Vec<N>>
    where
        D: DeserializeOwned + Send,
        N: Send,
        F: Fn(D) -> WpConnection<N> + Send + Sync,
    {
        let mut state = PaginationState::new();
        let mut nodes = Vec::new();

        while !state.done {
            if state.pages >= self.max_pages {
                warn!(
                    endpoint = self.client.endpoint(),
                    pages = state.pages,
                    "page limit reached, remote collection truncated"
                );
                break;
            }

            let variables = json!({ "first": self.batch_size, "after": state.cursor });
            let page = connection(self.client.query::<D>(query, variables).await?);
            state.advance(page.nodes.len(), &page.page_info);
            nodes.extend(page.nodes);
        }

        debug!(
            endpoint = self.client.endpoint(),
            pages = state.pages,
            total = state.total_fetched,
            "remote walk complete"
        );
        Ok(nodes)
    }
}

/// Keep the first occurrence of every slug
fn dedupe_by_slug<T: ContentItem>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = items.len();
    let unique: Vec<T> = items
        .into_iter()
        .filter(|item| seen.insert(item.slug().to_string()))
        .collect();
    if unique.len() != before {
        warn!(dropped = before - unique.len(), "duplicate slugs in remote collection");
    }
    unique
}

fn upstream(e: Error) -> Error {
    match e {
        Error::Upstream { .. } => e,
        other => Error::upstream("wordpress", other.to_string()),
    }
}

#[async_trait]
impl ContentProvider<BlogPost> for WordPressSource {
    fn name(&self) -> &str {
        "wordpress"
    }

    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<BlogPost>> {
        let nodes = self
            .walk(GET_POSTS, |d: PostsData| d.posts)
            .await
            .map_err(upstream)?;
        let posts = dedupe_by_slug(nodes.into_iter().map(normalize_post).collect());
        Ok(filter_items(&posts, filter))
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let data: PostBySlugData = self
            .client
            .query(GET_POST_BY_SLUG, json!({ "slug": slug }))
            .await
            .map_err(upstream)?;
        Ok(data.post_by.map(normalize_post))
    }
}

#[async_trait]
impl ContentProvider<WorkItem> for WordPressSource {
    fn name(&self) -> &str {
        "wordpress"
    }

    async fn fetch_all(&self, filter: Option<&str>) -> Result<Vec<WorkItem>> {
        let nodes = self
            .walk(GET_WORKS, |d: WorksData| d.works)
            .await
            .map_err(upstream)?;
        let works = dedupe_by_slug(nodes.into_iter().map(normalize_work).collect());
        Ok(filter_items(&works, filter))
    }

    async fn fetch_by_slug(&self, slug: &str) -> Result<Option<WorkItem>> {
        let data: WorkBySlugData = self
            .client
            .query(GET_WORK_BY_SLUG, json!({ "slug": slug }))
            .await
            .map_err(upstream)?;
        Ok(data.work_by.map(normalize_work))
    }
}
