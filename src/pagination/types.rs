//! Pagination types
//!
//! Defines the page request, the page result and its wire representation.

use serde::{Deserialize, Serialize};

/// Hard ceiling on items per page, whatever the caller asks for
pub const MAX_PAGE_SIZE: usize = 30;

/// Default page size for the blog listing
pub const DEFAULT_POSTS_PAGE_SIZE: usize = 6;

/// Default page size for the work listing
pub const DEFAULT_WORKS_PAGE_SIZE: usize = 9;

/// Parameters for one page of a cursor-paginated collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Requested number of items (clamped to [`MAX_PAGE_SIZE`])
    pub first: usize,
    /// Slug of the last item already seen
    pub after: Option<String>,
    /// Category/type filter
    pub filter: Option<String>,
}

impl PageRequest {
    /// Create a request for the first `first` items
    pub fn new(first: usize) -> Self {
        Self {
            first,
            after: None,
            filter: None,
        }
    }

    /// Continue after the given cursor
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Continue after an optional cursor
    #[must_use]
    pub fn after_opt(mut self, cursor: Option<String>) -> Self {
        self.after = cursor;
        self
    }

    /// Restrict to one category/type
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Restrict to an optional category/type
    #[must_use]
    pub fn filter_opt(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Page size after clamping
    pub fn clamped_first(&self) -> usize {
        self.first.min(MAX_PAGE_SIZE)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Slug of the last item in `items`, `None` when empty
    pub end_cursor: Option<String>,
    /// More items exist after this page in the filtered collection
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// The empty, terminal page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            end_cursor: None,
            has_next_page: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Continuation info as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// Wire shape of a page: `{ nodes, pageInfo: { hasNextPage, endCursor } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub nodes: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> From<Page<T>> for Connection<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            nodes: page.items,
            page_info: PageInfo {
                has_next_page: page.has_next_page,
                end_cursor: page.end_cursor,
            },
        }
    }
}

impl<T> From<Connection<T>> for Page<T> {
    fn from(conn: Connection<T>) -> Self {
        Self {
            items: conn.nodes,
            end_cursor: conn.page_info.end_cursor,
            has_next_page: conn.page_info.has_next_page,
        }
    }
}

/// Tracks progress while walking a remote cursor-paginated connection
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor to send with the next request
    pub cursor: Option<String>,
    /// Pages fetched so far
    pub pages: u32,
    /// Total items fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fetched page and decide whether to continue
    pub fn advance(&mut self, fetched: usize, info: &PageInfo) {
        self.pages += 1;
        self.total_fetched += fetched as u64;
        match (&info.end_cursor, info.has_next_page) {
            (Some(cursor), true) if !cursor.is_empty() && fetched > 0 => {
                self.cursor = Some(cursor.clone());
            }
            _ => self.mark_done(),
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}
