//! Analytics module
//!
//! Consent-aware event tracking.
//!
//! # Overview
//!
//! Every event goes through [`EventDispatcher::track`]. Sinks that set
//! [`AnalyticsSink::requires_consent`] only see it when the visitor's
//! [`ConsentContext`] allows analytics; cookieless sinks always do. A visitor
//! who never chose is treated as consenting and may opt out at any time.

mod consent;
mod events;
mod sinks;
mod tracking;

pub use consent::{
    ConsentContext, ConsentState, ConsentStore, FileConsentStore, MemoryConsentStore,
};
pub use events::{AnalyticsEvent, AnalyticsSink, EventDispatcher, EventParams, ParamValue};
pub use sinks::{CollectorSink, PerformanceMarkSink, RecordingSink};
pub use tracking::{
    ClickTracker, Jargon, BUTTON_CLICK, CLICK_DEBOUNCE, JARGON_CLICK, JARGON_IMPRESSION,
};

#[cfg(test)]
mod tests;
