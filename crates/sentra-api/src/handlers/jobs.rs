//! Job intake and owner-scoped query handlers.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use sentra_core::NewJob;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::fetch_owned_job;
use crate::response::{created, success};
use crate::AppState;

/// Submission payload. Unknown fields are rejected outright; missing
/// ones fail validation before any store access.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitJobRequest {
    pub file_type: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
}

/// POST /api/v1/submit
///
/// Creates a new pending job for the authenticated subject. No
/// deduplication: identical submissions create distinct jobs, and
/// callers needing idempotency must track their own correlation key.
pub async fn submit_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SubmitJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = NewJob::new(
        auth.subject.subject_id,
        body.file_type.as_deref().unwrap_or(""),
        body.file_name.unwrap_or_default(),
        body.file_path.unwrap_or_default(),
    )?;

    let job = state.db.jobs.create(new).await?;
    info!(job_id = %job.id, subject_id = %job.owner_id, "Job created");

    Ok(created(
        serde_json::json!({ "jobId": job.id }),
        "Job submitted successfully",
    ))
}

/// GET /api/v1/jobs/:id/status
///
/// Lifecycle fields only, never findings detail.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_owned_job(&state.db, job_id, &auth.subject.subject_id).await?;
    Ok(success(job.status_summary()))
}

/// GET /api/v1/jobs/:id/results
pub async fn get_job_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_owned_job(&state.db, job_id, &auth.subject.subject_id).await?;
    Ok(success(job))
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/jobs/user/list
///
/// The caller's jobs, most recent first. The store applies the default
/// limit when none (or a non-positive one) is given.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = state
        .db
        .jobs
        .list_for_owner(&auth.subject.subject_id, query.limit.unwrap_or(0))
        .await?;

    Ok(success(serde_json::json!({
        "jobs": jobs,
        "count": jobs.len(),
    })))
}
