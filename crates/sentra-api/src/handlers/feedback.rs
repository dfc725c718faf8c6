//! Reviewer feedback handler.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use sentra_core::NewFeedback;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::response::created;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitFeedbackRequest {
    pub job_id: Option<String>,
    pub finding_id: Option<String>,
    pub label: Option<String>,
    pub note: Option<String>,
}

/// POST /api/v1/feedback
///
/// Append-only: every call inserts a fresh record, and several records
/// may annotate the same finding. Collaborative policy — the submitting
/// user need not own the job, but the referenced job and finding must
/// exist.
pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job_ref = body
        .job_id
        .ok_or_else(|| ApiError::BadRequest("jobId is required".to_string()))?;
    let finding_id = body
        .finding_id
        .ok_or_else(|| ApiError::BadRequest("findingId is required".to_string()))?;
    let label = body
        .label
        .ok_or_else(|| ApiError::BadRequest("label is required".to_string()))?;

    // An id that cannot reference any job is indistinguishable from a
    // missing one.
    let job_id = Uuid::parse_str(&job_ref)
        .map_err(|_| ApiError::NotFound("Job not found".to_string()))?;

    let new = NewFeedback::new(
        job_id,
        finding_id,
        auth.subject.subject_id,
        &label,
        body.note,
    )?;

    let job = state
        .db
        .jobs
        .get(job_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    if !job.findings.iter().any(|f| f.id == new.finding_id) {
        return Err(ApiError::NotFound("Finding not found".to_string()));
    }

    let feedback = state.db.feedback.insert(new).await?;
    info!(feedback_id = %feedback.id, subject_id = %feedback.user_id, "Feedback submitted");

    Ok(created(
        serde_json::json!({ "feedbackId": feedback.id }),
        "Feedback submitted successfully",
    ))
}
