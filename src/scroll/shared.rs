//! Async handle over a paging session

use super::fetch::PageFetcher;
use super::session::{LoadOutcome, PagingSession, SessionStatus};
use crate::content::ContentItem;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// A paging session shared between the view and in-flight loads.
///
/// The lock is never held across a fetch.
pub struct SharedSession<T> {
    inner: Arc<Mutex<PagingSession<T>>>,
}

impl<T> Clone for SharedSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ContentItem> SharedSession<T> {
    pub fn new(session: PagingSession<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Load the next page; `None` when gated (in flight, done or unmounted)
    pub async fn load_more(&self, fetcher: &dyn PageFetcher<T>) -> Option<LoadOutcome> {
        let ticket = self.inner.lock().await.begin_load()?;
        debug!(after = ?ticket.request().after, "loading next page");

        let result = fetcher.fetch_page(ticket.request()).await;
        if let Err(e) = &result {
            warn!("load more failed: {e}");
        }

        Some(self.inner.lock().await.complete(ticket, result))
    }

    /// Keep loading until the session is done or a load fails
    pub async fn load_all(&self, fetcher: &dyn PageFetcher<T>) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.load_more(fetcher).await {
            outcomes.push(outcome);
            if !matches!(outcome, LoadOutcome::Appended(_)) {
                break;
            }
        }
        outcomes
    }

    pub async fn reset(&self, filter: Option<String>) {
        self.inner.lock().await.reset(filter);
    }

    pub async fn unmount(&self) {
        self.inner.lock().await.unmount();
    }

    pub async fn status(&self) -> SessionStatus {
        self.inner.lock().await.status().clone()
    }

    /// Copy of the items loaded so far
    pub async fn items(&self) -> Vec<T> {
        self.inner.lock().await.items().to_vec()
    }

    pub async fn snapshot(&self) -> PagingSession<T> {
        self.inner.lock().await.clone()
    }
}
