//! HTTP server: content listings, detail lookups, spotlight banners and the
//! contact endpoint

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::USER_AGENT, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerSettings;
use crate::contact::{ContactService, SubmitResponse};
use crate::content::{
    featured_works, load_page, ContentItem, ContentProvider, ContentSources, SpotlightSlot,
};
use crate::error::{Error, Result};
use crate::pagination::{
    Connection, PageRequest, DEFAULT_POSTS_PAGE_SIZE, DEFAULT_WORKS_PAGE_SIZE,
};

/// Featured works shown when no `limit` is given
pub const DEFAULT_FEATURED_LIMIT: usize = 3;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sources: ContentSources,
    pub contact: ContactService,
}

impl AppState {
    pub fn new(sources: ContentSources, contact: ContactService) -> Self {
        Self { sources, contact }
    }
}

/// Query string of the listing endpoints.
///
/// Everything is read as text so a malformed `first` falls back to the
/// default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    first: Option<String>,
    after: Option<String>,
    category: Option<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
}

impl ListQuery {
    fn page_request(self, default_first: usize, filter: Option<String>) -> PageRequest {
        PageRequest::new(parse_count(self.first.as_deref(), default_first))
            .after_opt(self.after.filter(|a| !a.is_empty()))
            .filter_opt(filter.filter(|f| !f.trim().is_empty()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FeaturedQuery {
    limit: Option<String>,
}

/// Positive integer from a query value, or the default
fn parse_count(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// 502 when the content source failed, 500 for anything local
fn content_error(err: &Error) -> Response {
    if err.is_upstream() {
        error_body(StatusCode::BAD_GATEWAY, "Content source unavailable.")
    } else {
        error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
    }
}

/// Build the router
pub fn router(state: AppState, cors_origins: &[String]) -> Result<Router> {
    let cors = cors_layer(cors_origins)?;

    Ok(Router::new()
        .route("/health", get(health))
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/works", get(list_works))
        .route("/api/works/featured", get(list_featured_works))
        .route("/api/works/:slug", get(get_work))
        .route("/api/announcement", get(announcement))
        .route("/api/product", get(product))
        .route(
            "/api/contact",
            get(contact_method_not_allowed).post(submit_contact),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| Error::invalid_value("server.cors_origins", format!("{o}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Start the HTTP server
pub async fn serve(state: AppState, settings: &ServerSettings) -> Result<()> {
    let app = router(state, &settings.cors_origins)?;

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;
    info!("Starting HTTP server on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filter = query.category.clone();
    let request = query.page_request(DEFAULT_POSTS_PAGE_SIZE, filter);
    list(state.sources.posts.as_ref(), &request).await
}

async fn list_works(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let filter = query.work_type.clone();
    let request = query.page_request(DEFAULT_WORKS_PAGE_SIZE, filter);
    list(state.sources.works.as_ref(), &request).await
}

async fn list<T: ContentItem + Serialize>(
    provider: &dyn ContentProvider<T>,
    request: &PageRequest,
) -> Response {
    match load_page(provider, request).await {
        Ok(page) => (StatusCode::OK, Json(Connection::from(page))).into_response(),
        Err(e) => {
            error!(source = provider.name(), "listing failed: {e}");
            content_error(&e)
        }
    }
}

async fn get_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    detail(state.sources.posts.as_ref(), &slug).await
}

async fn get_work(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    detail(state.sources.works.as_ref(), &slug).await
}

async fn detail<T: ContentItem + Serialize>(
    provider: &dyn ContentProvider<T>,
    slug: &str,
) -> Response {
    match provider.fetch_by_slug(slug).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item)).into_response(),
        Ok(None) => error_body(StatusCode::NOT_FOUND, format!("No entry with slug '{slug}'.")),
        Err(e) => {
            error!(source = provider.name(), slug, "lookup failed: {e}");
            content_error(&e)
        }
    }
}

async fn list_featured_works(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeaturedQuery>,
) -> Response {
    let limit = parse_count(query.limit.as_deref(), DEFAULT_FEATURED_LIMIT);
    match state.sources.works.fetch_all(None).await {
        Ok(works) => (StatusCode::OK, Json(featured_works(works, Some(limit)))).into_response(),
        Err(e) => {
            error!("featured works failed: {e}");
            content_error(&e)
        }
    }
}

async fn announcement(State(state): State<Arc<AppState>>) -> Response {
    spotlight(&state, SpotlightSlot::Announcement)
}

async fn product(State(state): State<Arc<AppState>>) -> Response {
    spotlight(&state, SpotlightSlot::Product)
}

/// 200 with the banner, 204 while none is scheduled
fn spotlight(state: &AppState, slot: SpotlightSlot) -> Response {
    match state.sources.spotlights.current(slot) {
        Some(banner) => (StatusCode::OK, Json(banner)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn submit_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return error_body(StatusCode::BAD_REQUEST, "Invalid request body.");
    };
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match state.contact.submit(&payload, user_agent).await {
        Ok(submission) => (
            StatusCode::CREATED,
            Json(SubmitResponse {
                success: true,
                id: submission.id,
            }),
        )
            .into_response(),
        Err(Error::Validation { message }) => error_body(StatusCode::UNPROCESSABLE_ENTITY, message),
        Err(e) => {
            error!("contact submission failed: {e}");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save your message. Please try again.",
            )
        }
    }
}

async fn contact_method_not_allowed() -> Response {
    error_body(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed.")
}
