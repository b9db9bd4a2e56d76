//! Scroll module
//!
//! Client side of the listings: the visibility trigger that asks for more,
//! the paging session that tracks what has been loaded, and the fetchers
//! that get the next page from the content API or straight from a provider.
//!
//! # Example
//!
//! ```ignore
//! let session = SharedSession::new(PagingSession::<BlogPost>::new(6));
//! let fetcher = ApiFetcher::new(http, "https://sabako.id", ContentKind::Posts);
//! session.load_all(&fetcher).await;
//! ```

mod fetch;
mod session;
mod shared;
mod trigger;

pub use fetch::{ApiFetcher, PageFetcher, ProviderFetcher};
pub use session::{LoadOutcome, LoadTicket, PagingSession, SessionStatus};
pub use shared::SharedSession;
pub use trigger::{InfiniteScroll, LoadMore};
