//! makerbench-api library
//!
//! HTTP service for the MakerBench bookmark directory: public listing,
//! search and submission of bookmarks, tag browsing, and a moderation queue.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod client;
pub mod db;
pub mod error;
pub mod pagination;
pub mod services;
pub mod validation;

use services::PreviewProvider;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Metadata, screenshot and image hosting for submissions
    pub preview: Arc<dyn PreviewProvider>,
    /// Admin bearer token; moderation routes are disabled when `None`
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Create new application state with moderation disabled
    pub fn new(db: SqlitePool, preview: Arc<dyn PreviewProvider>) -> Self {
        Self {
            db,
            preview,
            admin_token: None,
        }
    }

    /// Enable the moderation routes behind `token`
    pub fn with_admin_token(mut self, token: impl Into<Arc<str>>) -> Self {
        self.admin_token = Some(token.into());
        self
    }
}

/// Build application router
///
/// Every known route answers other methods with a 405 error envelope and an
/// `Allow` header; unknown paths get a 404 envelope.
pub fn build_router(state: AppState) -> Router {
    use axum::http::{header, Method};
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let admin = Router::new()
        .route(
            "/api/admin/bookmarks",
            get(api::list_for_review).fallback(api::get_only),
        )
        .route(
            "/api/admin/bookmarks/:id/status",
            post(api::update_status).fallback(api::post_only),
        )
        .layer(middleware::from_fn_with_state(state.clone(), api::admin_auth));

    let public = Router::new()
        .route(
            "/api/bookmarks",
            get(api::list_bookmarks)
                .post(api::submit_bookmark)
                .fallback(api::get_or_post),
        )
        .route(
            "/api/bookmarks/search",
            get(api::search_bookmarks).fallback(api::get_only),
        )
        .route(
            "/api/bookmarks/:id",
            get(api::get_bookmark).fallback(api::get_only),
        )
        .route("/api/tags", get(api::list_tags).fallback(api::get_only))
        .route(
            "/api/tags/popular",
            get(api::popular_tags).fallback(api::get_only),
        )
        .route(
            "/api/tags/search",
            get(api::search_tags).fallback(api::get_only),
        )
        .merge(api::health_routes());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(admin)
        .merge(public)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
