//! Page fetchers used by paging sessions

use crate::content::{load_page, ContentItem, ContentProvider};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Connection, Page, PageRequest};
use crate::types::ContentKind;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Fetches one page of a listing
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>>;
}

/// Reads pages from a running content API (`/api/posts`, `/api/works`)
pub struct ApiFetcher<T> {
    http: Arc<HttpClient>,
    url: String,
    kind: ContentKind,
    _item: PhantomData<fn() -> T>,
}

impl<T> ApiFetcher<T> {
    pub fn new(http: Arc<HttpClient>, base_url: &str, kind: ContentKind) -> Self {
        Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), kind.api_path()),
            kind,
            _item: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl<T> PageFetcher<T> for ApiFetcher<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>> {
        let config = RequestConfig::new()
            .query("first", request.first.to_string())
            .query_opt("after", request.after.clone())
            .query_opt(self.kind.filter_param(), request.filter.clone());

        let connection: Connection<T> = self.http.get_json(&self.url, config).await?;
        Ok(connection.into())
    }
}

/// Pages cut locally from a provider
pub struct ProviderFetcher<T: ContentItem> {
    provider: Arc<dyn ContentProvider<T>>,
}

impl<T: ContentItem> ProviderFetcher<T> {
    pub fn new(provider: Arc<dyn ContentProvider<T>>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<T: ContentItem> PageFetcher<T> for ProviderFetcher<T> {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<T>> {
        load_page(self.provider.as_ref(), request).await
    }
}
