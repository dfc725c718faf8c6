//! sentra-api — HTTP API server for sentra.
//!
//! The router, application state, and middleware live here so the
//! binary and integration tests assemble the exact same service.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use sentra_core::IdentityVerifier;
use sentra_db::Database;

/// Global rate limiter type (direct quota, no keyed bucketing).
pub type GlobalRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically —
/// useful for log correlation and debugging production incidents.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id: HeaderValue = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
///
/// Every dependency is constructed explicitly and injected here —
/// there is no global store or verifier handle — so tests substitute
/// the in-memory store and a static verifier freely.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// External identity verifier for end-user bearer credentials.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Shared credential for the engine-facing transition interface.
    pub engine_token: String,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

/// Request body size cap (these payloads are metadata, not content).
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Public intake + read surface
        .route("/api/v1/submit", post(handlers::jobs::submit_job))
        .route("/api/v1/jobs/user/list", get(handlers::jobs::list_jobs))
        .route("/api/v1/jobs/:id/status", get(handlers::jobs::get_job_status))
        .route(
            "/api/v1/jobs/:id/results",
            get(handlers::jobs::get_job_results),
        )
        .route("/api/v1/feedback", post(handlers::feedback::submit_feedback))
        .route("/api/v1/export/:id", get(handlers::export::export_job))
        // Engine-facing mutation surface (engine credential only)
        .route(
            "/internal/v1/jobs/:id/transition",
            post(handlers::engine::transition_job),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}

/// Global rate-limit middleware; a rejected request gets the envelope
/// with 429 and is never handed to a handler.
async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "success": false,
                    "message": "Too many requests, please try again later.",
                })),
            )
                .into_response();
        }
    }
    next.run(request).await
}
