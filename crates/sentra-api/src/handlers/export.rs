//! Report export handler.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::fetch_owned_job;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /api/v1/export/:id?format=json
///
/// Pure read-side projection of the full job record, behind the same
/// access gate as the results query. Anything but the JSON format
/// fails with 501 rather than silently falling back.
pub async fn export_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_owned_job(&state.db, job_id, &auth.subject.subject_id).await?;

    match query.format.as_deref() {
        Some("json") => {
            let body = serde_json::to_vec_pretty(&job)
                .map_err(|e| ApiError::from(sentra_core::Error::from(e)))?;

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"report_{job_id}.json\""),
                    ),
                ],
                body,
            ))
        }
        other => Err(ApiError::NotImplemented(format!(
            "Export format not supported: {}",
            other.unwrap_or("(none)")
        ))),
    }
}
