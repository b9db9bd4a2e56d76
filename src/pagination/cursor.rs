//! Slug-cursor pagination over an in-memory collection

use super::types::{Page, PageRequest};
use crate::content::{matches_classification, ContentItem};

/// Cut one page out of the full ordered collection.
///
/// A cursor that no longer matches any slug restarts from the beginning
/// instead of failing.
pub fn paginate<T: ContentItem>(all: &[T], request: &PageRequest) -> Page<T> {
    let filtered: Vec<&T> = match request.filter.as_deref() {
        Some(filter) => all
            .iter()
            .filter(|item| matches_classification(*item, filter))
            .collect(),
        None => all.iter().collect(),
    };

    let first = request.clamped_first();
    let start = start_index(&filtered, request.after.as_deref());
    let end = start.saturating_add(first).min(filtered.len());

    let items: Vec<T> = filtered[start..end]
        .iter()
        .map(|item| (*item).clone())
        .collect();

    let has_next_page = start + first < filtered.len();
    let end_cursor = items.last().map(|item| item.slug().to_string());

    Page {
        items,
        end_cursor,
        has_next_page,
    }
}

/// Position right after the cursor, or 0 when absent or stale
fn start_index<T: ContentItem>(items: &[&T], after: Option<&str>) -> usize {
    let Some(cursor) = after.filter(|c| !c.is_empty()) else {
        return 0;
    };

    match items.iter().position(|item| item.slug() == cursor) {
        Some(idx) => idx + 1,
        None => {
            tracing::debug!(cursor, "stale cursor, restarting from the first item");
            0
        }
    }
}
