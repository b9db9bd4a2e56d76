//! Paging session state machine
//!
//! ```text
//! idle --begin_load--> loading --ok, more--> idle
//!                        |      --ok, last--> done
//!                        +------ err ------> error --begin_load--> loading
//! ```
//!
//! Every load is tagged with the session generation. `reset` and `unmount`
//! bump the generation, so a response for an older generation is discarded.

use crate::content::ContentItem;
use crate::error::Error;
use crate::pagination::{Page, PageRequest};
use tracing::debug;

/// Where the session is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    /// Last load failed; loading again retries from the same cursor
    Error(String),
    /// The last page has been received
    Done,
}

/// Handed out by [`PagingSession::begin_load`], handed back on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    request: PageRequest,
}

impl LoadTicket {
    /// The page to fetch
    pub fn request(&self) -> &PageRequest {
        &self.request
    }
}

/// What happened to a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page appended; this many items were added
    Appended(usize),
    /// Load failed; items and cursor untouched
    Failed,
    /// Response belonged to a reset or unmounted session
    Discarded,
}

/// Client-side state for one listing
#[derive(Debug, Clone)]
pub struct PagingSession<T> {
    items: Vec<T>,
    cursor: Option<String>,
    page_size: usize,
    filter: Option<String>,
    status: SessionStatus,
    generation: u64,
    mounted: bool,
}

impl<T: ContentItem> PagingSession<T> {
    /// Empty session; the first load fetches the first page
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            page_size,
            filter: None,
            status: SessionStatus::Idle,
            generation: 0,
            mounted: true,
        }
    }

    /// Session continuing from a page that was already rendered
    pub fn from_initial(page_size: usize, filter: Option<String>, initial: Page<T>) -> Self {
        let mut session = Self::new(page_size);
        session.filter = filter;
        session.apply(initial);
        session
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn is_done(&self) -> bool {
        self.status == SessionStatus::Done
    }

    /// Start a load unless one is in flight, the end was reached or the
    /// session was unmounted
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if !self.mounted || matches!(self.status, SessionStatus::Loading | SessionStatus::Done) {
            return None;
        }
        self.status = SessionStatus::Loading;

        Some(LoadTicket {
            generation: self.generation,
            request: PageRequest::new(self.page_size)
                .after_opt(self.cursor.clone())
                .filter_opt(self.filter.clone()),
        })
    }

    /// Apply the result of a load started with `ticket`
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Page<T>, Error>) -> LoadOutcome {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale page"
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => LoadOutcome::Appended(self.apply(page)),
            Err(e) => {
                self.status = SessionStatus::Error(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Start over, optionally with a different filter
    pub fn reset(&mut self, filter: Option<String>) {
        self.generation += 1;
        self.items.clear();
        self.cursor = None;
        self.filter = filter;
        self.status = SessionStatus::Idle;
    }

    /// Stop accepting results
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
    }

    fn apply(&mut self, page: Page<T>) -> usize {
        let added = page.items.len();
        self.items.extend(page.items);

        // A page claiming more without a usable cursor cannot be continued
        let next_cursor = page.end_cursor.filter(|c| !c.is_empty());
        match next_cursor {
            Some(cursor) if page.has_next_page && added > 0 => {
                self.cursor = Some(cursor);
                self.status = SessionStatus::Idle;
            }
            Some(cursor) => {
                self.cursor = Some(cursor);
                self.status = SessionStatus::Done;
            }
            None => self.status = SessionStatus::Done,
        }
        added
    }
}
