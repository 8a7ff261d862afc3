//! REST API endpoints.
//!
//! Axum-based HTTP API for summoner profiles, match history and the
//! cached aggregate stats, plus cache administration.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cache::CacheError;
use crate::service::ServiceError;
use crate::source::SourceError;

pub mod routes;
pub mod state;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SourceError> for ApiError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::NotFound(who) => ApiError::NotFound(who),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(e: CacheError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Source(e) => e.into(),
            ServiceError::Cache(e) => e.into(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Build the application router: JSON API under `/api`, static
/// dashboard files at the root.
pub fn build_router(state: AppState) -> Router {
    let cors = match state.config.server.cors_origin.as_str() {
        "*" => CorsLayer::new().allow_origin(Any).allow_methods(Any),
        origin => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>().unwrap_or_else(|_| {
                axum::http::HeaderValue::from_static("http://localhost:3000")
            }))
            .allow_methods(Any),
    };

    let dashboard_dir = state.config.server.dashboard_dir.clone();

    let api = Router::new()
        .route("/health", get(routes::health::health))
        .route("/summoners/:server/:alias", get(routes::summoners::profile))
        .route(
            "/summoners/:server/:alias/masteries",
            get(routes::summoners::masteries),
        )
        .route(
            "/summoners/:server/:alias/games",
            get(routes::summoners::games),
        )
        .route(
            "/summoners/:server/:alias/stats",
            get(routes::summoners::stats),
        )
        .route(
            "/summoners/:server/:alias/stats/add",
            get(routes::summoners::add_stats),
        )
        .route("/cache/keys", get(routes::cache::keys))
        .route("/cache/:key", delete(routes::cache::delete_key))
        .route("/cache", delete(routes::cache::clear))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(dashboard_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
