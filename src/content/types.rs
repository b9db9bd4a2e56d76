//! Canonical content types
//!
//! Every source (mock records, WordPress nodes) is normalized into one of
//! these before it reaches pagination or the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An item that can live in a paginated collection.
///
/// The slug is the item's identity and doubles as its pagination cursor.
pub trait ContentItem: Clone + Send + Sync + 'static {
    /// Unique, stable identifier within the collection
    fn slug(&self) -> &str;

    /// Classification used for optional filtering (category or work type)
    fn classification(&self) -> &str;
}

/// Case-insensitive classification match used by every filter in the crate
pub fn matches_classification<T: ContentItem>(item: &T, filter: &str) -> bool {
    item.classification().eq_ignore_ascii_case(filter.trim())
}

// ============================================================================
// Blog Post
// ============================================================================

/// A blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    /// Plain-text excerpt
    pub excerpt: String,
    /// Body paragraphs (mock data) or a single rendered HTML block (WordPress)
    #[serde(default)]
    pub content: Vec<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub read_time: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_alt: Option<String>,
}

impl ContentItem for BlogPost {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn classification(&self) -> &str {
        &self.category
    }
}

// ============================================================================
// Work Item
// ============================================================================

/// Kind of delivered project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    #[default]
    Web,
    Mobile,
    Iot,
}

impl WorkType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Web => "web",
            WorkType::Mobile => "mobile",
            WorkType::Iot => "iot",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(WorkType::Web),
            "mobile" => Ok(WorkType::Mobile),
            "iot" => Ok(WorkType::Iot),
            other => Err(Error::validation(format!("Unknown work type: {other}"))),
        }
    }
}

/// A portfolio entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub client: String,
    pub year: String,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl ContentItem for WorkItem {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn classification(&self) -> &str {
        self.work_type.as_str()
    }
}
