//! Outbound notifications for new submissions
//!
//! Delivery runs on a dedicated worker fed through a bounded channel, so a
//! slow or failing webhook never delays the contact response.

use super::types::ContactSubmission;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Event name carried in every webhook payload
pub const SUBMISSION_EVENT: &str = "contact.submitted";

/// Something to tell about a new submission
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, submission: &ContactSubmission) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    event: &'static str,
    submission: &'a ContactSubmission,
}

/// POSTs a JSON payload to each configured URL
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: Arc<HttpClient>,
    urls: Vec<String>,
}

impl WebhookNotifier {
    pub fn new(http: Arc<HttpClient>, urls: Vec<String>) -> Self {
        Self { http, urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    /// Every URL is attempted; the error lists the ones that failed
    async fn notify(&self, submission: &ContactSubmission) -> Result<()> {
        let body = serde_json::to_value(WebhookPayload {
            event: SUBMISSION_EVENT,
            submission,
        })?;

        let results = join_all(
            self.urls
                .iter()
                .map(|url| self.http.post(url, body.clone())),
        )
        .await;

        let failures: Vec<String> = self
            .urls
            .iter()
            .zip(results)
            .filter_map(|(url, result)| result.err().map(|e| format!("{url}: {e}")))
            .collect();

        if failures.is_empty() {
            debug!(id = %submission.id, webhooks = self.urls.len(), "submission delivered");
            Ok(())
        } else {
            Err(Error::notification(failures.join("; ")))
        }
    }
}

/// Bounded queue drained by one worker task
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<ContactSubmission>,
}

impl NotificationQueue {
    /// Spawn the worker; it exits once every queue handle is dropped
    pub fn start(notifier: Arc<dyn Notifier>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<ContactSubmission>(capacity.max(1));

        let worker = tokio::spawn(async move {
            info!(notifier = notifier.name(), "notification worker started");
            while let Some(submission) = rx.recv().await {
                if let Err(e) = notifier.notify(&submission).await {
                    warn!(
                        notifier = notifier.name(),
                        id = %submission.id,
                        "notification failed: {e}"
                    );
                }
            }
            debug!("notification worker stopped");
        });

        (Self { tx }, worker)
    }

    /// Submissions waiting for the worker
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Queue a submission without waiting; `false` if it was dropped
    pub fn enqueue(&self, submission: ContactSubmission) -> bool {
        match self.tx.try_send(submission) {
            Ok(()) => true,
            Err(TrySendError::Full(submission)) => {
                warn!(id = %submission.id, "notification queue full, dropping");
                false
            }
            Err(TrySendError::Closed(submission)) => {
                warn!(id = %submission.id, "notification worker gone, dropping");
                false
            }
        }
    }
}
