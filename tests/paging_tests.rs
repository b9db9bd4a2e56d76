//! End-to-end paging tests
//!
//! Serves the API on a local port and walks it the way the listing pages do:
//! a paging session fed by the HTTP fetcher, driven by the scroll trigger.

use pretty_assertions::assert_eq;
use sabako_site::cli::{router, AppState};
use sabako_site::contact::{ContactService, MemorySubmissionStore};
use sabako_site::content::{mock_posts, mock_works, BlogPost, ContentSources, WorkItem};
use sabako_site::http::{HttpClient, HttpClientConfig};
use sabako_site::pagination::PageRequest;
use sabako_site::scroll::{
    ApiFetcher, InfiniteScroll, LoadOutcome, PageFetcher, PagingSession, SessionStatus,
    SharedSession,
};
use sabako_site::ContentKind;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let state = AppState::new(
        ContentSources::mock().unwrap(),
        ContactService::new(Arc::new(MemorySubmissionStore::new())),
    );
    let app = router(state, &[]).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client() -> Arc<HttpClient> {
    let config = HttpClientConfig::builder()
        .max_retries(0)
        .no_rate_limit()
        .build();
    Arc::new(HttpClient::with_config(config).unwrap())
}

#[tokio::test]
async fn test_walk_covers_every_post_once() {
    let base = spawn_server().await;
    let fetcher = ApiFetcher::<BlogPost>::new(client(), &base, ContentKind::Posts);
    let session = SharedSession::new(PagingSession::new(4));

    let outcomes = session.load_all(&fetcher).await;

    assert_eq!(
        outcomes,
        vec![LoadOutcome::Appended(4), LoadOutcome::Appended(2)]
    );
    assert_eq!(session.status().await, SessionStatus::Done);
    assert_eq!(session.items().await, mock_posts().unwrap());
}

#[tokio::test]
async fn test_filtered_walk_matches_prefiltered_collection() {
    let base = spawn_server().await;
    let fetcher = ApiFetcher::<WorkItem>::new(client(), &base, ContentKind::Works);
    let session = SharedSession::new(PagingSession::new(2));
    session.reset(Some("WEB".to_string())).await;

    session.load_all(&fetcher).await;

    let expected: Vec<WorkItem> = mock_works()
        .unwrap()
        .into_iter()
        .filter(|w| w.work_type.to_string() == "web")
        .collect();
    assert_eq!(session.items().await, expected);
}

#[tokio::test]
async fn test_server_rendered_first_page_continues_client_side() {
    let base = spawn_server().await;
    let fetcher = ApiFetcher::<BlogPost>::new(client(), &base, ContentKind::Posts);

    let initial = fetcher.fetch_page(&PageRequest::new(3)).await.unwrap();
    let session = SharedSession::new(PagingSession::from_initial(3, None, initial));

    assert_eq!(
        session.load_more(&fetcher).await,
        Some(LoadOutcome::Appended(3))
    );
    assert_eq!(session.load_more(&fetcher).await, None);
    assert_eq!(session.items().await.len(), 6);
}

#[tokio::test]
async fn test_trigger_driven_walk() {
    let base = spawn_server().await;
    let fetcher = ApiFetcher::<WorkItem>::new(client(), &base, ContentKind::Works);
    let session = SharedSession::new(PagingSession::new(2));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut trigger = InfiniteScroll::new(move || {
        let _ = tx.send(());
    });
    trigger.on_visibility(true);

    while rx.try_recv().is_ok() {
        trigger.set_loading(true);
        session.load_more(&fetcher).await;
        trigger.set_done(session.status().await == SessionStatus::Done);
        trigger.set_loading(false);
    }

    assert_eq!(trigger.fired(), 3);
    assert_eq!(session.items().await.len(), 6);
}

#[tokio::test]
async fn test_unreachable_server_leaves_session_retryable() {
    let fetcher = ApiFetcher::<BlogPost>::new(client(), "http://127.0.0.1:9", ContentKind::Posts);
    let session = SharedSession::new(PagingSession::new(6));

    assert_eq!(
        session.load_more(&fetcher).await,
        Some(LoadOutcome::Failed)
    );
    assert!(matches!(session.status().await, SessionStatus::Error(_)));
    assert!(session.items().await.is_empty());
}
