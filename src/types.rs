//! Small shared types
//!
//! Collection identity, retry pacing, the configured log level and a helper
//! for the optional string fields both the CMS and the environment hand us.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Header and query maps
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Content Kind
// ============================================================================

/// The two paginated collections the site serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Blog posts, filtered by category
    Posts,
    /// Portfolio works, filtered by type
    Works,
}

impl ContentKind {
    /// Name of the query parameter used to filter this collection
    pub fn filter_param(self) -> &'static str {
        match self {
            ContentKind::Posts => "category",
            ContentKind::Works => "type",
        }
    }

    /// Listing path on the content API
    pub fn api_path(self) -> &'static str {
        match self {
            ContentKind::Posts => "/api/posts",
            ContentKind::Works => "/api/works",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Posts => write!(f, "posts"),
            ContentKind::Works => write!(f, "works"),
        }
    }
}

// ============================================================================
// Retry Pacing
// ============================================================================

/// How the delay between outbound retries grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Every retry waits `initial_backoff`
    Constant,
    /// Retry `n` waits `n * initial_backoff`
    Linear,
    /// Delay doubles per retry
    #[default]
    Exponential,
}

// ============================================================================
// Log Level
// ============================================================================

/// `log_level` in the settings file; `RUST_LOG` still takes precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

// ============================================================================
// Blank Strings
// ============================================================================

/// Treat empty and whitespace-only strings as missing.
///
/// WPGraphQL returns `""` for unset ACF fields and unset environment
/// variables often arrive as `VAR=`.
pub trait Blank: Sized {
    /// `None` when blank, the untouched value otherwise
    fn non_blank(self) -> Option<String>;
}

impl Blank for String {
    fn non_blank(self) -> Option<String> {
        (!self.trim().is_empty()).then_some(self)
    }
}

impl Blank for Option<String> {
    fn non_blank(self) -> Option<String> {
        self.and_then(Blank::non_blank)
    }
}
