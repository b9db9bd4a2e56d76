//! Outbound HTTP
//!
//! One [`HttpClient`] per process serves the WordPress source, webhook
//! delivery, the analytics collector and the CLI's listing walker. Requests
//! pass a shared token bucket and are retried on 429, 5xx gateway errors
//! and transport failures, per the `http` section of the settings.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
