//! REST API.
//!
//! Public read routes, report submission, and shared-secret-protected
//! administrative routes, all under `/api`.

pub mod admin_routes;
pub mod auth;
pub mod error;
pub mod report_routes;
pub mod search_routes;
pub mod word_routes;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRequest, FromRequestParts};
use axum::http::{header, HeaderName, Method};
use axum::{middleware, routing::get, routing::post, Router};
use sqlx::sqlite::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SearchLimits;
use crate::database::{ReportRepository, WordRepository};

pub use error::AppError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub words: WordRepository,
    pub reports: ReportRepository,
    pub admin_secret: Option<Arc<str>>,
    pub limits: SearchLimits,
}

impl AppState {
    pub fn new(pool: SqlitePool, admin_secret: Option<&str>, limits: SearchLimits) -> Self {
        Self {
            words: WordRepository::new(pool.clone()),
            reports: ReportRepository::new(pool),
            admin_secret: admin_secret.map(Arc::from),
            limits,
        }
    }
}

/// `Query` whose rejection is a JSON 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejection is a JSON 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Json` body whose rejection is a JSON 400.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // Routes that require the admin secret
    let admin = Router::new()
        .route("/api/reports", get(report_routes::list_reports))
        .route("/api/seed", post(admin_routes::seed))
        .route("/api/seed/clear", post(admin_routes::clear))
        .route(
            "/api/admin/fix-normalization",
            post(admin_routes::fix_normalization),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public = Router::new()
        .route("/", get(banner))
        .route("/api/health", get(search_routes::health))
        .route("/api/stats", get(search_routes::stats))
        .route("/api/search", get(search_routes::search))
        .route("/api/search/autocomplete", get(search_routes::autocomplete))
        .route("/api/search/etymologies", get(search_routes::etymologies))
        .route("/api/search/random", get(search_routes::random))
        .route("/api/words/list", get(word_routes::list_words))
        .route("/api/words/range", get(word_routes::range))
        .route("/api/word/by-offset", get(word_routes::by_offset))
        .route("/api/word/:id", get(word_routes::get_word))
        .route("/api/word/:id/rendered", get(word_routes::rendered))
        .route("/api/reports", post(report_routes::create_report));

    public
        .merge(admin)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(auth::ADMIN_SECRET_HEADER),
        ])
        .max_age(Duration::from_secs(86_400))
}

async fn banner() -> &'static str {
    "Clauson Sözlük API"
}
