//! HTTP handlers for sentra-api.

pub mod engine;
pub mod export;
pub mod feedback;
pub mod jobs;

use uuid::Uuid;

use sentra_core::{ensure_owner, Job};
use sentra_db::Database;

use crate::error::ApiError;

/// The access gate, composed with the store lookup in one place.
///
/// Existence is checked first (`NotFound`), then ownership
/// (`Forbidden`). Every owner-scoped read — status, results, export —
/// goes through here so the policy cannot drift between endpoints.
pub(crate) async fn fetch_owned_job(
    db: &Database,
    job_id: Uuid,
    caller_id: &str,
) -> Result<Job, ApiError> {
    let job = db
        .jobs
        .get(job_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    ensure_owner(&job, caller_id)?;
    Ok(job)
}
