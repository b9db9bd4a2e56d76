//! Contact module
//!
//! `POST /api/contact` pipeline: sanitize, validate, persist, then queue
//! notifications. Persisting is the only step the caller waits for.

mod notify;
mod store;
mod types;
mod validate;

pub use notify::{NotificationQueue, Notifier, WebhookNotifier, SUBMISSION_EVENT};
pub use store::{JsonlSubmissionStore, MemorySubmissionStore, SubmissionStore};
pub use types::{ContactForm, ContactSubmission, SubmissionMeta, SubmitResponse};
pub use validate::{is_valid_email, parse_form, sanitize, sanitize_form, validate, MAX_FIELD_LEN};

use crate::config::{ContactSettings, HttpSettings};
use crate::error::Result;
use crate::http::HttpClient;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Accepts contact submissions
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn SubmissionStore>,
    queue: Option<NotificationQueue>,
}

impl ContactService {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store, queue: None }
    }

    #[must_use]
    pub fn with_queue(mut self, queue: NotificationQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Build store and notifier from settings.
    ///
    /// Must run inside a tokio runtime; the returned handle is the
    /// notification worker, if one was started.
    pub fn from_settings(
        contact: &ContactSettings,
        http: &HttpSettings,
    ) -> Result<(Self, Option<JoinHandle<()>>)> {
        let store: Arc<dyn SubmissionStore> = match &contact.submissions_path {
            Some(path) => Arc::new(JsonlSubmissionStore::new(path)),
            None => Arc::new(MemorySubmissionStore::new()),
        };
        info!(store = store.name(), "contact submissions store ready");

        let service = Self::new(store);
        if contact.webhook_urls.is_empty() {
            return Ok((service, None));
        }

        let client = Arc::new(HttpClient::with_config(http.client_config())?);
        let notifier = Arc::new(WebhookNotifier::new(client, contact.webhook_urls.clone()));
        let (queue, worker) = NotificationQueue::start(notifier, contact.queue_capacity);
        Ok((service.with_queue(queue), Some(worker)))
    }

    pub fn store(&self) -> &Arc<dyn SubmissionStore> {
        &self.store
    }

    /// Validate and persist a raw JSON body, then queue notifications
    pub async fn submit(&self, body: &Value, user_agent: Option<String>) -> Result<ContactSubmission> {
        let form = parse_form(body)?;
        let submission = ContactSubmission::new(form, user_agent);

        self.store.save(&submission).await?;
        info!(id = %submission.id, "contact submission accepted");

        if let Some(queue) = &self.queue {
            queue.enqueue(submission.clone());
        }
        Ok(submission)
    }
}

#[cfg(test)]
mod tests;
