//! Analytics sinks

use super::events::{AnalyticsEvent, AnalyticsSink};
use crate::error::Result;
use crate::http::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Cookieless performance marks named `sabako:<event>`.
///
/// Carries no identifiers, so it receives events regardless of consent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceMarkSink;

impl PerformanceMarkSink {
    /// Mark name for an event
    pub fn mark_name(event: &str) -> String {
        format!("sabako:{event}")
    }
}

#[async_trait]
impl AnalyticsSink for PerformanceMarkSink {
    fn name(&self) -> &str {
        "performance_mark"
    }

    fn requires_consent(&self) -> bool {
        false
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        let detail = serde_json::to_string(&event.params)?;
        info!(
            target: "sabako::rum",
            mark = %Self::mark_name(&event.name),
            %detail,
            "performance mark"
        );
        Ok(())
    }
}

/// Posts every event as JSON to a collector endpoint; consent required
#[derive(Debug, Clone)]
pub struct CollectorSink {
    http: Arc<HttpClient>,
    endpoint: String,
}

impl CollectorSink {
    pub fn new(http: Arc<HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AnalyticsSink for CollectorSink {
    fn name(&self) -> &str {
        "collector"
    }

    fn requires_consent(&self) -> bool {
        true
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        let body = serde_json::to_value(event)?;
        self.http.post(&self.endpoint, body).await?;
        Ok(())
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    requires_consent: bool,
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingSink {
    /// Sink that behaves like a cookieless one
    pub fn cookieless() -> Self {
        Self::default()
    }

    /// Sink that behaves like a consent-gated one
    pub fn consent_gated() -> Self {
        Self {
            requires_consent: true,
            events: Mutex::new(Vec::new()),
        }
    }

    pub async fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().await.clone()
    }

    /// Recorded event names in order
    pub async fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    /// Recorded events as JSON, for assertions and dumps
    pub async fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(&*self.events.lock().await)?)
    }
}

#[async_trait]
impl AnalyticsSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn requires_consent(&self) -> bool {
        self.requires_consent
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}
