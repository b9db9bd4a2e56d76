//! Mapping from WordPress nodes to the canonical content types

use super::types::{WpPost, WpWork};
use crate::content::{BlogPost, WorkItem, WorkType};
use crate::types::Blank;
use regex::Regex;
use std::sync::LazyLock;

const DEFAULT_CATEGORY: &str = "General";
const DEFAULT_AUTHOR: &str = "SABAKO Team";
const DEFAULT_READ_TIME: &str = "5 min read";
const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove HTML tags and surrounding whitespace
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}

/// Reading time at 200 words per minute, at least one minute
pub fn estimate_read_time(html: &str) -> String {
    let text = HTML_TAG.replace_all(html, " ");
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

/// `2024-11-14T09:30:00` -> `2024-11-14`
fn date_part(date: Option<&str>) -> String {
    date.and_then(|d| d.split('T').next())
        .unwrap_or_default()
        .to_string()
}

pub fn normalize_post(post: WpPost) -> BlogPost {
    let content = post.content.non_blank();
    let read_time = content
        .as_deref()
        .map_or_else(|| DEFAULT_READ_TIME.to_string(), estimate_read_time);
    let title = post.title.unwrap_or_default();

    let (cover_image, cover_image_alt) = match post.featured_image {
        Some(edge) => {
            let alt = edge.node.alt_text.non_blank().unwrap_or_else(|| title.clone());
            (Some(edge.node.source_url), Some(alt))
        }
        None => (None, None),
    };

    BlogPost {
        date: date_part(post.date.as_deref()),
        category: post
            .categories
            .and_then(|c| c.nodes.into_iter().next())
            .map_or_else(|| DEFAULT_CATEGORY.to_string(), |term| term.name),
        read_time,
        author: post
            .author
            .map_or_else(|| DEFAULT_AUTHOR.to_string(), |edge| edge.node.name),
        tags: post
            .tags
            .map(|t| t.nodes.into_iter().map(|term| term.name).collect())
            .unwrap_or_default(),
        excerpt: post.excerpt.as_deref().map(strip_html).unwrap_or_default(),
        content: content.into_iter().collect(),
        slug: post.slug,
        title,
        cover_image,
        cover_image_alt,
    }
}

pub fn normalize_work(work: WpWork) -> WorkItem {
    let fields = work.work_fields.unwrap_or_default();

    let work_type = match fields.work_type.as_deref() {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::debug!(slug = %work.slug, raw, "unknown work type, using web");
            WorkType::Web
        }),
        None => WorkType::Web,
    };

    let year = fields.year.non_blank().unwrap_or_else(|| {
        work.date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .unwrap_or_default()
            .to_string()
    });

    WorkItem {
        id: work
            .database_id
            .map_or_else(|| work.slug.clone(), |id| id.to_string()),
        title: work.title.unwrap_or_default(),
        client: fields.client.unwrap_or_default(),
        year,
        work_type,
        category: fields.category.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        challenge: fields.challenge.non_blank(),
        solution: fields.solution.non_blank(),
        outcome: fields.outcome.non_blank(),
        tags: fields.tags.unwrap_or_default(),
        featured: fields.featured.unwrap_or(false),
        cover_image: work.featured_image.map(|edge| edge.node.source_url),
        slug: work.slug,
    }
}
