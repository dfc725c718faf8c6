//! Engine-facing lifecycle transition endpoint.
//!
//! This is the internal mutation interface: the only code path that
//! moves a job's status, guarded by the engine credential rather than
//! end-user auth. End users reach job state exclusively through the
//! read-only public handlers.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use sentra_core::{Classification, Finding, JobStatus, TransitionRequest};

use crate::auth::EngineAuth;
use crate::error::ApiError;
use crate::response::success_with_message;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransitionBody {
    pub status: Option<String>,
    pub classification: Option<String>,
    pub confidence: Option<i32>,
    pub findings: Option<Vec<Finding>>,
}

/// POST /internal/v1/jobs/:id/transition
pub async fn transition_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    _engine: EngineAuth,
    Json(body): Json<TransitionBody>,
) -> Result<impl IntoResponse, ApiError> {
    let status = body
        .status
        .ok_or_else(|| ApiError::BadRequest("status is required".to_string()))?;
    let new_status = status.parse::<JobStatus>()?;
    let classification = body
        .classification
        .as_deref()
        .map(str::parse::<Classification>)
        .transpose()?;

    let req = TransitionRequest {
        new_status,
        classification,
        confidence: body.confidence,
        findings: body.findings,
    };

    let job = state.db.jobs.transition(job_id, req).await?;
    info!(
        job_id = %job.id,
        job_status = %job.status,
        finding_count = job.findings.len(),
        "Job transitioned"
    );

    Ok(success_with_message(
        job.status_summary(),
        "Job transitioned",
    ))
}
