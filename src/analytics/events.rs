//! Event model and the consent-aware dispatcher

use super::consent::ConsentContext;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{trace, warn};

/// Primitive event parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// Event parameters, ordered by key
pub type EventParams = BTreeMap<String, ParamValue>;

/// One tracked event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub name: String,
    pub params: EventParams,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>, params: EventParams) -> Self {
        Self {
            name: name.into(),
            params,
            timestamp: Utc::now(),
        }
    }
}

/// Destination for analytics events
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the sink may only receive events after the visitor consented
    fn requires_consent(&self) -> bool;

    async fn record(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// Fans one event out to every sink the visitor's consent allows
#[derive(Default, Clone)]
pub struct EventDispatcher {
    sinks: Vec<Arc<dyn AnalyticsSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver an event, returning how many sinks accepted it.
    ///
    /// Sink failures are logged and never reach the caller.
    pub async fn track(
        &self,
        name: &str,
        params: EventParams,
        consent: &ConsentContext,
    ) -> usize {
        let analytics_enabled = consent.analytics_enabled().await;
        let event = AnalyticsEvent::new(name, params);
        let mut delivered = 0;

        for sink in &self.sinks {
            if sink.requires_consent() && !analytics_enabled {
                trace!(sink = sink.name(), event = name, "skipped, no consent");
                continue;
            }
            match sink.record(&event).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(sink = sink.name(), event = name, "analytics sink failed: {e}"),
            }
        }

        delivered
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.sinks.iter().map(|s| s.name()).collect();
        f.debug_struct("EventDispatcher").field("sinks", &names).finish()
    }
}
