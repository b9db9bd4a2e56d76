//! WPGraphQL response shapes
//!
//! Only the fields the site reads are modelled; everything is optional
//! except the slug, because ACF field groups and plugins vary per install.

use crate::pagination::PageInfo;
use serde::Deserialize;

/// `{ node: T }` wrapper used for single relations
#[derive(Debug, Clone, Deserialize)]
pub struct WpEdge<T> {
    pub node: T,
}

/// `{ nodes: [T] }` wrapper used for list relations
#[derive(Debug, Clone, Deserialize)]
pub struct WpNodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

/// Paginated root connection
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpConnection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpImage {
    pub source_url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WpAuthor {
    pub name: String,
}

/// Category or tag
#[derive(Debug, Clone, Deserialize)]
pub struct WpTerm {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpPost {
    pub slug: String,
    #[serde(default)]
    pub database_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    /// ISO 8601
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Rendered HTML, only present on the by-slug query
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub featured_image: Option<WpEdge<WpImage>>,
    #[serde(default)]
    pub author: Option<WpEdge<WpAuthor>>,
    #[serde(default)]
    pub categories: Option<WpNodes<WpTerm>>,
    #[serde(default)]
    pub tags: Option<WpNodes<WpTerm>>,
}

/// ACF field group attached to the `work` post type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpWorkFields {
    pub client: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub outcome: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WpWork {
    pub slug: String,
    #[serde(default)]
    pub database_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub featured_image: Option<WpEdge<WpImage>>,
    #[serde(default)]
    pub work_fields: Option<WpWorkFields>,
}

#[derive(Debug, Deserialize)]
pub struct PostsData {
    pub posts: WpConnection<WpPost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBySlugData {
    pub post_by: Option<WpPost>,
}

#[derive(Debug, Deserialize)]
pub struct WorksData {
    pub works: WpConnection<WpWork>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkBySlugData {
    pub work_by: Option<WpWork>,
}
