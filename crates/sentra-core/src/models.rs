//! Domain model for sentra: jobs, findings, and feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Default number of records returned by owner-scoped job listings
/// when the caller gives no limit (or a non-positive one).
pub const DEFAULT_LIST_LIMIT: i64 = 10;

// =============================================================================
// JOB TYPES
// =============================================================================

/// Status of a scan job.
///
/// `Completed` and `Failed` are terminal: no transition is defined out
/// of them. Re-submission requires a new job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// String form used on the wire and in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// Whether no further transition is defined out of this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            other => Err(Error::Validation(format!("unknown job status: {other}"))),
        }
    }
}

/// Engine verdict for a job's content.
///
/// Starts at `Pending` and is set once by the analysis engine at
/// completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Pending,
    Safe,
    Suspicious,
    Malicious,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Pending => "pending",
            Classification::Safe => "safe",
            Classification::Suspicious => "suspicious",
            Classification::Malicious => "malicious",
        }
    }
}

impl std::str::FromStr for Classification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Classification::Pending),
            "safe" => Ok(Classification::Safe),
            "suspicious" => Ok(Classification::Suspicious),
            "malicious" => Ok(Classification::Malicious),
            other => Err(Error::Validation(format!("unknown classification: {other}"))),
        }
    }
}

/// Kind of content a job scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Text,
    Code,
    Config,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Text => "text",
            FileType::Code => "code",
            FileType::Config => "config",
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(FileType::Text),
            "code" => Ok(FileType::Code),
            "config" => Ok(FileType::Config),
            other => Err(Error::Validation(format!(
                "fileType must be one of text, code, config (got: {other})"
            ))),
        }
    }
}

// =============================================================================
// FINDINGS
// =============================================================================

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// A single detected issue within a job's content.
///
/// Findings are created by the engine as part of the completion
/// transition, are immutable afterwards, and are never deleted
/// independently of their job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Unique within the owning job.
    pub id: String,
    /// Short category label (e.g. a vulnerability class).
    #[serde(rename = "type")]
    pub finding_type: String,
    pub severity: Severity,
    pub description: String,
    pub location: String,
    pub recommendation: String,
}

// =============================================================================
// JOB
// =============================================================================

/// One submitted analysis request and its evolving outcome.
///
/// Visible and mutable only through operations performed by, or on
/// behalf of, its `owner_id`. Status moves exclusively through the
/// lifecycle transition contract (see [`crate::lifecycle`]); end-user
/// operations are read-only with respect to job state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    /// Verified subject identifier of the submitter; the sole
    /// authorization key.
    pub owner_id: String,
    pub file_type: FileType,
    pub file_name: String,
    pub file_path: String,
    pub status: JobStatus,
    pub classification: Classification,
    /// Score in 0..=100; meaningful only once classification is set.
    pub confidence: i32,
    /// Insertion-ordered findings produced during analysis.
    pub findings: Vec<Finding>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// The status view returned by `get_status`: the lifecycle fields
    /// without leaking findings detail.
    pub fn status_summary(&self) -> JobStatusSummary {
        JobStatusSummary {
            job_id: self.id,
            status: self.status,
            classification: self.classification,
            confidence: self.confidence,
        }
    }
}

/// Subset of job fields exposed by the status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusSummary {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub classification: Classification,
    pub confidence: i32,
}

/// A validated submission, ready for the job store.
///
/// Construction is the only validation point for submissions: every
/// field is checked before any store access.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub owner_id: String,
    pub file_type: FileType,
    pub file_name: String,
    pub file_path: String,
}

impl NewJob {
    /// Validate raw submission input.
    ///
    /// All four fields are required and non-empty; `file_type` must be
    /// one of the recognized values. Fails with [`Error::Validation`]
    /// otherwise.
    pub fn new(
        owner_id: impl Into<String>,
        file_type: &str,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Result<Self> {
        let owner_id = owner_id.into();
        let file_name = file_name.into();
        let file_path = file_path.into();

        if owner_id.trim().is_empty() {
            return Err(Error::Validation("ownerId is required".to_string()));
        }
        if file_name.trim().is_empty() {
            return Err(Error::Validation("fileName is required".to_string()));
        }
        if file_path.trim().is_empty() {
            return Err(Error::Validation("filePath is required".to_string()));
        }
        let file_type = file_type.parse::<FileType>()?;

        Ok(Self {
            owner_id,
            file_type,
            file_name,
            file_path,
        })
    }

    /// Materialize the pending job record this submission creates.
    pub fn into_job(self) -> Job {
        let now = Utc::now();
        Job {
            id: crate::new_v7(),
            owner_id: self.owner_id,
            file_type: self.file_type,
            file_name: self.file_name,
            file_path: self.file_path,
            status: JobStatus::Pending,
            classification: Classification::Pending,
            confidence: 0,
            findings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// FEEDBACK
// =============================================================================

/// Reviewer judgment on one finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLabel {
    Correct,
    Incorrect,
    Unsure,
}

impl FeedbackLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackLabel::Correct => "correct",
            FeedbackLabel::Incorrect => "incorrect",
            FeedbackLabel::Unsure => "unsure",
        }
    }
}

impl std::str::FromStr for FeedbackLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "correct" => Ok(FeedbackLabel::Correct),
            "incorrect" => Ok(FeedbackLabel::Incorrect),
            "unsure" => Ok(FeedbackLabel::Unsure),
            other => Err(Error::Validation(format!(
                "label must be one of correct, incorrect, unsure (got: {other})"
            ))),
        }
    }
}

/// A reviewer's append-only annotation on a finding.
///
/// Never edited or deleted; multiple records may target the same
/// finding, forming a running annotation log rather than a single
/// verdict. References its job and finding by identifier only — it
/// never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub job_id: Uuid,
    pub finding_id: String,
    pub user_id: String,
    pub label: FeedbackLabel,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated feedback submission.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub job_id: Uuid,
    pub finding_id: String,
    pub user_id: String,
    pub label: FeedbackLabel,
    pub note: Option<String>,
}

impl NewFeedback {
    /// Validate raw feedback input. The label must be in the closed
    /// enum; target existence is checked separately against the store.
    pub fn new(
        job_id: Uuid,
        finding_id: impl Into<String>,
        user_id: impl Into<String>,
        label: &str,
        note: Option<String>,
    ) -> Result<Self> {
        let finding_id = finding_id.into();
        let user_id = user_id.into();

        if finding_id.trim().is_empty() {
            return Err(Error::Validation("findingId is required".to_string()));
        }
        if user_id.trim().is_empty() {
            return Err(Error::Validation("userId is required".to_string()));
        }
        let label = label.parse::<FeedbackLabel>()?;

        Ok(Self {
            job_id,
            finding_id,
            user_id,
            label,
            note,
        })
    }

    /// Materialize the feedback record this submission creates.
    pub fn into_feedback(self) -> Feedback {
        Feedback {
            id: crate::new_v7(),
            job_id: self.job_id,
            finding_id: self.finding_id,
            user_id: self.user_id,
            label: self.label,
            note: self.note,
            created_at: Utc::now(),
        }
    }
}

/// Convert a findings slice to its JSONB representation.
pub fn findings_to_json(findings: &[Finding]) -> Result<JsonValue> {
    serde_json::to_value(findings).map_err(Into::into)
}

/// Parse a findings slice from its JSONB representation.
pub fn findings_from_json(value: JsonValue) -> Result<Vec<Finding>> {
    serde_json::from_value(value).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finding() -> Finding {
        Finding {
            id: "f1".to_string(),
            finding_type: "XSS".to_string(),
            severity: Severity::Medium,
            description: "Unescaped template interpolation".to_string(),
            location: "line 42".to_string(),
            recommendation: "Escape user input before rendering".to_string(),
        }
    }

    #[test]
    fn test_job_status_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
        let status: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, JobStatus::Failed);
    }

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_file_type_parse() {
        assert_eq!("code".parse::<FileType>().unwrap(), FileType::Code);
        assert_eq!("text".parse::<FileType>().unwrap(), FileType::Text);
        assert_eq!("config".parse::<FileType>().unwrap(), FileType::Config);
        assert!("binary".parse::<FileType>().is_err());
        assert!("".parse::<FileType>().is_err());
        // Case-sensitive, like every wire enum here
        assert!("Code".parse::<FileType>().is_err());
    }

    #[test]
    fn test_feedback_label_parse() {
        assert_eq!(
            "correct".parse::<FeedbackLabel>().unwrap(),
            FeedbackLabel::Correct
        );
        assert_eq!(
            "unsure".parse::<FeedbackLabel>().unwrap(),
            FeedbackLabel::Unsure
        );
        let err = "maybe".parse::<FeedbackLabel>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_new_job_valid() {
        let new = NewJob::new("u1", "code", "a.py", "uploads/u1/a.py").unwrap();
        let job = new.into_job();
        assert_eq!(job.owner_id, "u1");
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.classification, Classification::Pending);
        assert_eq!(job.confidence, 0);
        assert!(job.findings.is_empty());
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn test_new_job_missing_file_name() {
        let err = NewJob::new("u1", "code", "", "uploads/u1/a.py").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("fileName"));
    }

    #[test]
    fn test_new_job_missing_owner() {
        let err = NewJob::new("  ", "code", "a.py", "uploads/u1/a.py").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_new_job_bad_file_type() {
        let err = NewJob::new("u1", "pdf", "a.pdf", "uploads/u1/a.pdf").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_new_job_ids_are_unique() {
        let mut ids = std::collections::HashSet::new();
        for _ in 0..1000 {
            let job = NewJob::new("u1", "text", "a.txt", "uploads/u1/a.txt")
                .unwrap()
                .into_job();
            assert!(ids.insert(job.id), "job id collision");
        }
    }

    #[test]
    fn test_finding_serde_type_field() {
        let json = serde_json::to_value(sample_finding()).unwrap();
        // Wire field is "type", not "finding_type"
        assert_eq!(json["type"], "XSS");
        assert_eq!(json["severity"], "medium");
        let back: Finding = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_finding());
    }

    #[test]
    fn test_findings_json_round_trip() {
        let findings = vec![sample_finding()];
        let value = findings_to_json(&findings).unwrap();
        let back = findings_from_json(value).unwrap();
        assert_eq!(back, findings);
    }

    #[test]
    fn test_new_feedback_valid() {
        let new = NewFeedback::new(
            crate::new_v7(),
            "f1",
            "reviewer-9",
            "incorrect",
            Some("false positive".to_string()),
        )
        .unwrap();
        let fb = new.into_feedback();
        assert_eq!(fb.label, FeedbackLabel::Incorrect);
        assert_eq!(fb.note.as_deref(), Some("false positive"));
    }

    #[test]
    fn test_new_feedback_invalid_label() {
        let err =
            NewFeedback::new(crate::new_v7(), "f1", "reviewer-9", "maybe", None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_new_feedback_missing_finding() {
        let err = NewFeedback::new(crate::new_v7(), "", "reviewer-9", "correct", None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_status_summary_excludes_findings() {
        let mut job = NewJob::new("u1", "code", "a.py", "uploads/u1/a.py")
            .unwrap()
            .into_job();
        job.findings.push(sample_finding());
        let summary = job.status_summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("findings").is_none());
        assert_eq!(json["jobId"], job.id.to_string());
    }
}
