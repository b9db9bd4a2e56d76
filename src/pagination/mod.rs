//! Pagination module
//!
//! Cursor pagination shared by the blog and work listings.
//!
//! # Overview
//!
//! A page is cut from the full ordered collection using the slug of the last
//! item the caller has seen. The same contract is used for the first
//! server-rendered page and for every "load more" request that follows.
//! [`PaginationState`] covers the other direction: walking a remote
//! connection that is itself cursor-paginated.

mod cursor;
mod types;

pub use cursor::paginate;
pub use types::{
    Connection, Page, PageInfo, PageRequest, PaginationState, DEFAULT_POSTS_PAGE_SIZE,
    DEFAULT_WORKS_PAGE_SIZE, MAX_PAGE_SIZE,
};
