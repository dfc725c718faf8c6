//! PostgreSQL job store implementation.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use sentra_core::models::{findings_from_json, findings_to_json};
use sentra_core::{
    allowed_prior_states, Classification, Error, FileType, Job, JobStatus, NewJob, Result,
    TransitionRequest, DEFAULT_LIST_LIMIT,
};

/// PostgreSQL implementation of [`sentra_core::JobStore`].
///
/// Findings are stored as a JSONB column on the job row: a job
/// exclusively owns its findings, so the embedded-document layout
/// keeps reads and the completion write atomic without joins.
pub struct PgJobStore {
    pool: Pool<Postgres>,
}

impl PgJobStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Convert string from database to JobStatus.
    fn str_to_status(s: &str) -> JobStatus {
        match s {
            "pending" => JobStatus::Pending,
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending, // fallback
        }
    }

    /// Convert string from database to Classification.
    fn str_to_classification(s: &str) -> Classification {
        match s {
            "pending" => Classification::Pending,
            "safe" => Classification::Safe,
            "suspicious" => Classification::Suspicious,
            "malicious" => Classification::Malicious,
            _ => Classification::Pending, // fallback
        }
    }

    /// Convert string from database to FileType.
    fn str_to_file_type(s: &str) -> FileType {
        match s {
            "text" => FileType::Text,
            "code" => FileType::Code,
            "config" => FileType::Config,
            _ => FileType::Text, // fallback
        }
    }

    /// Parse a job row into a Job struct.
    fn parse_job_row(row: sqlx::postgres::PgRow) -> Result<Job> {
        let status: String = row.get("status");
        let classification: String = row.get("classification");
        let file_type: String = row.get("file_type");
        let findings: JsonValue = row.get("findings");

        Ok(Job {
            id: row.get("id"),
            owner_id: row.get("owner_id"),
            file_type: Self::str_to_file_type(&file_type),
            file_name: row.get("file_name"),
            file_path: row.get("file_path"),
            status: Self::str_to_status(&status),
            classification: Self::str_to_classification(&classification),
            confidence: row.get("confidence"),
            findings: findings_from_json(findings)?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

const JOB_COLUMNS: &str = "id, owner_id, file_type, file_name, file_path, status, \
     classification, confidence, findings, created_at, updated_at";

#[async_trait]
impl sentra_core::JobStore for PgJobStore {
    async fn create(&self, new: NewJob) -> Result<Job> {
        let job = new.into_job();

        sqlx::query(
            "INSERT INTO jobs (id, owner_id, file_type, file_name, file_path, status,
                 classification, confidence, findings, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(job.id)
        .bind(&job.owner_id)
        .bind(job.file_type.as_str())
        .bind(&job.file_name)
        .bind(&job.file_path)
        .bind(job.status.as_str())
        .bind(job.classification.as_str())
        .bind(job.confidence)
        .bind(findings_to_json(&job.findings)?)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(job)
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Job>> {
        let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(Self::parse_job_row).transpose()
    }

    async fn list_for_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<Job>> {
        let limit = if limit > 0 { limit } else { DEFAULT_LIST_LIMIT };

        let rows = sqlx::query(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs
             WHERE owner_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        ))
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(Self::parse_job_row).collect()
    }

    async fn transition(&self, job_id: Uuid, req: TransitionRequest) -> Result<Job> {
        req.validate()?;

        let prior: Vec<String> = allowed_prior_states(req.new_status)
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        let findings = req.findings.as_deref().map(findings_to_json).transpose()?;

        // Single conditional UPDATE keyed on the allowed prior states:
        // concurrent transitions on the same job serialize here, and a
        // reader never observes the new status with stale result
        // fields.
        let row = sqlx::query(&format!(
            "UPDATE jobs
             SET status = $2,
                 classification = COALESCE($3, classification),
                 confidence = COALESCE($4, confidence),
                 findings = COALESCE($5, findings),
                 updated_at = $6
             WHERE id = $1 AND status = ANY($7)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(job_id)
        .bind(req.new_status.as_str())
        .bind(req.classification.map(|c| c.as_str()))
        .bind(req.confidence)
        .bind(findings)
        .bind(Utc::now())
        .bind(&prior)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if let Some(row) = row {
            return Self::parse_job_row(row);
        }

        // Conditional write matched nothing: either the job is absent
        // or its current status has no edge to the requested one.
        let current: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match current {
            None => Err(Error::NotFound(format!("job {job_id}"))),
            Some(status) => Err(Error::InvalidTransition {
                from: Self::str_to_status(&status),
                to: req.new_status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_str_to_status_all_variants() {
        assert_eq!(PgJobStore::str_to_status("pending"), JobStatus::Pending);
        assert_eq!(
            PgJobStore::str_to_status("processing"),
            JobStatus::Processing
        );
        assert_eq!(PgJobStore::str_to_status("completed"), JobStatus::Completed);
        assert_eq!(PgJobStore::str_to_status("failed"), JobStatus::Failed);
    }

    #[test]
    fn test_str_to_status_unknown_fallback() {
        assert_eq!(PgJobStore::str_to_status("unknown"), JobStatus::Pending);
        assert_eq!(PgJobStore::str_to_status(""), JobStatus::Pending);
    }

    #[test]
    fn test_str_to_classification_all_variants() {
        assert_eq!(
            PgJobStore::str_to_classification("pending"),
            Classification::Pending
        );
        assert_eq!(
            PgJobStore::str_to_classification("safe"),
            Classification::Safe
        );
        assert_eq!(
            PgJobStore::str_to_classification("suspicious"),
            Classification::Suspicious
        );
        assert_eq!(
            PgJobStore::str_to_classification("malicious"),
            Classification::Malicious
        );
    }

    #[test]
    fn test_str_to_file_type_round_trip() {
        for file_type in [FileType::Text, FileType::Code, FileType::Config] {
            assert_eq!(PgJobStore::str_to_file_type(file_type.as_str()), file_type);
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(PgJobStore::str_to_status(status.as_str()), status);
        }
    }
}
