//! Service settings
//!
//! Settings come from three layers, later layers winning:
//! 1. A YAML file (every field has a default, so the file is optional)
//! 2. Environment variables (`SABAKO_*`, plus the conventional `WP_GRAPHQL_URL`)
//! 3. Command line flags, applied by the CLI runner

use crate::content::UpstreamFailure;
use crate::error::{Error, Result};
use crate::graphql::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_PAGES};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Blank, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: LogLevel,

    /// Listener and CORS
    pub server: ServerSettings,

    /// Where content comes from and how failures degrade
    pub content: ContentSettings,

    /// Outbound HTTP behavior (CMS and webhooks)
    pub http: HttpSettings,

    /// Contact submissions and notifications
    pub contact: ContactSettings,

    /// Client-side analytics
    pub analytics: AnalyticsSettings,
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerSettings {
    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// WPGraphQL endpoint; the embedded mock content is served when unset
    pub graphql_url: Option<String>,

    /// Bearer token sent to the CMS (application password or JWT)
    pub auth_token: Option<String>,

    /// What the blog listing degrades to when the CMS fails
    pub posts_on_failure: UpstreamFailure,

    /// What the work listing degrades to when the CMS fails
    pub works_on_failure: UpstreamFailure,

    /// Nodes requested per remote page
    pub batch_size: u32,

    /// Maximum remote pages walked per collection fetch
    pub max_pages: u32,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            graphql_url: None,
            auth_token: None,
            posts_on_failure: UpstreamFailure::Empty,
            works_on_failure: UpstreamFailure::Mock,
            batch_size: DEFAULT_BATCH_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum number of retries
    pub max_retries: u32,

    /// Retry backoff
    pub backoff: BackoffSettings,

    /// Outbound rate limit; `null` disables it
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_retries: 2,
            backoff: BackoffSettings::default(),
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    #[serde(rename = "type")]
    pub backoff_type: BackoffType,
    pub initial_ms: u64,
    pub max_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: 200,
            max_ms: 5_000,
        }
    }
}

impl HttpSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );

        match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()).build(),
            None => builder.no_rate_limit().build(),
        }
    }
}

// ============================================================================
// Contact
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// JSON-lines file receiving submissions; kept in memory when unset
    pub submissions_path: Option<PathBuf>,

    /// Webhooks notified of every accepted submission
    pub webhook_urls: Vec<String>,

    /// Pending notifications held before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            submissions_path: None,
            webhook_urls: Vec::new(),
            queue_capacity: 64,
        }
    }
}

// ============================================================================
// Analytics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Where the visitor's consent choice is persisted
    pub consent_path: PathBuf,

    /// Consent-gated event collector; only performance marks are emitted when unset
    pub collector_url: Option<String>,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            consent_path: PathBuf::from(".sabako/consent.json"),
            collector_url: None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Settings {
    /// Load from an optional YAML file, then apply the process environment.
    ///
    /// Not validated yet: command line flags still apply on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Parse a YAML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML settings
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse settings YAML: {e}")))
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).non_blank();

        if let Some(host) = var("SABAKO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SABAKO_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(level) = var("SABAKO_LOG_LEVEL")
            .and_then(|l| serde_yaml::from_str::<LogLevel>(&l.to_ascii_lowercase()).ok())
        {
            self.log_level = level;
        }
        if let Some(url) = var("SABAKO_GRAPHQL_URL").or_else(|| var("WP_GRAPHQL_URL")) {
            self.content.graphql_url = Some(url);
        }
        if let Some(token) = var("SABAKO_GRAPHQL_TOKEN").or_else(|| var("WP_AUTH_TOKEN")) {
            self.content.auth_token = Some(token);
        }
        if let Some(path) = var("SABAKO_SUBMISSIONS_PATH") {
            self.contact.submissions_path = Some(PathBuf::from(path));
        }
        if let Some(urls) = var("SABAKO_WEBHOOK_URLS") {
            self.contact.webhook_urls = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(path) = var("SABAKO_CONSENT_PATH") {
            self.analytics.consent_path = PathBuf::from(path);
        }
        if let Some(url) = var("SABAKO_COLLECTOR_URL") {
            self.analytics.collector_url = Some(url);
        }
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.content.graphql_url {
            validate_http_url("content.graphql_url", url)?;
        }
        for url in &self.contact.webhook_urls {
            validate_http_url("contact.webhook_urls", url)?;
        }
        if let Some(url) = &self.analytics.collector_url {
            validate_http_url("analytics.collector_url", url)?;
        }
        if self.content.batch_size == 0 || self.content.batch_size > 100 {
            return Err(Error::invalid_value(
                "content.batch_size",
                "must be between 1 and 100",
            ));
        }
        if self.content.max_pages == 0 {
            return Err(Error::invalid_value("content.max_pages", "must be positive"));
        }
        if self.contact.queue_capacity == 0 {
            return Err(Error::invalid_value(
                "contact.queue_capacity",
                "must be positive",
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Whether content is read from a CMS rather than the embedded data
    pub fn uses_cms(&self) -> bool {
        self.content.graphql_url.is_some()
    }
}

fn validate_http_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::invalid_value(field, format!("'{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::invalid_value(
            field,
            format!("'{raw}': unsupported scheme '{other}'"),
        )),
    }
}
