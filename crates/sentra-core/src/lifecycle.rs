//! Job lifecycle transition contract.
//!
//! Transitions are driven exclusively by the analysis engine, never by
//! end users. The valid edges are:
//!
//! ```text
//! pending    -> processing
//! processing -> completed
//! processing -> failed
//! pending    -> failed        (intake rejected by the engine)
//! ```
//!
//! Everything else — self-loops, skipping `processing` on the way to
//! `completed`, any edge out of a terminal state — fails with
//! [`Error::InvalidTransition`] and leaves the job unchanged.
//!
//! Stores serialize racing transitions per job with a conditional
//! write keyed on the expected prior status (the prior states come
//! from [`allowed_prior_states`]), so of two racing
//! `pending -> processing` calls exactly one succeeds and the loser
//! sees `InvalidTransition`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Classification, Finding, Job, JobStatus};

/// Whether the lifecycle contract defines an edge `from -> to`.
pub fn can_transition(from: JobStatus, to: JobStatus) -> bool {
    matches!(
        (from, to),
        (JobStatus::Pending, JobStatus::Processing)
            | (JobStatus::Processing, JobStatus::Completed)
            | (JobStatus::Processing, JobStatus::Failed)
            | (JobStatus::Pending, JobStatus::Failed)
    )
}

/// The set of prior states from which `to` is reachable.
///
/// This is the compare-and-set key for conditional store writes:
/// `UPDATE ... WHERE status = ANY(allowed_prior_states(to))`.
pub fn allowed_prior_states(to: JobStatus) -> &'static [JobStatus] {
    match to {
        JobStatus::Processing => &[JobStatus::Pending],
        JobStatus::Completed => &[JobStatus::Processing],
        JobStatus::Failed => &[JobStatus::Pending, JobStatus::Processing],
        // Nothing transitions back into pending.
        JobStatus::Pending => &[],
    }
}

/// An engine request to move a job along one lifecycle edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub new_status: JobStatus,
    /// Mandatory when transitioning into `completed`.
    pub classification: Option<Classification>,
    /// Mandatory when transitioning into `completed`; 0..=100.
    pub confidence: Option<i32>,
    /// Persisted on completion, replacing any previously attached set.
    pub findings: Option<Vec<Finding>>,
}

impl TransitionRequest {
    /// Shorthand for a transition that carries no result payload.
    pub fn to_status(new_status: JobStatus) -> Self {
        Self {
            new_status,
            classification: None,
            confidence: None,
            findings: None,
        }
    }

    /// Validate the request payload independent of the stored job.
    ///
    /// Completion requires a real classification and a confidence
    /// score; a confidence outside 0..=100 is rejected wherever it
    /// appears.
    pub fn validate(&self) -> Result<()> {
        if let Some(confidence) = self.confidence {
            if !(0..=100).contains(&confidence) {
                return Err(Error::Validation(format!(
                    "confidence must be in 0..=100 (got: {confidence})"
                )));
            }
        }

        if self.new_status == JobStatus::Completed {
            match self.classification {
                None | Some(Classification::Pending) => {
                    return Err(Error::Validation(
                        "completion requires a classification".to_string(),
                    ));
                }
                Some(_) => {}
            }
            if self.confidence.is_none() {
                return Err(Error::Validation(
                    "completion requires a confidence score".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Apply a transition to a job record in place.
///
/// Callers must hold whatever per-job serialization the store provides
/// (a mutex for the in-memory store; Postgres does this as a single
/// conditional UPDATE instead). The job is untouched on any error.
pub fn apply_transition(job: &mut Job, req: &TransitionRequest) -> Result<()> {
    req.validate()?;

    if !can_transition(job.status, req.new_status) {
        return Err(Error::InvalidTransition {
            from: job.status,
            to: req.new_status,
        });
    }

    job.status = req.new_status;
    if let Some(classification) = req.classification {
        job.classification = classification;
    }
    if let Some(confidence) = req.confidence {
        job.confidence = confidence;
    }
    if let Some(findings) = &req.findings {
        job.findings = findings.clone();
    }
    job.updated_at = Utc::now();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewJob, Severity};

    const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Processing,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    fn pending_job() -> Job {
        NewJob::new("u1", "code", "a.py", "uploads/u1/a.py")
            .unwrap()
            .into_job()
    }

    fn completion() -> TransitionRequest {
        TransitionRequest {
            new_status: JobStatus::Completed,
            classification: Some(Classification::Suspicious),
            confidence: Some(73),
            findings: Some(vec![Finding {
                id: "f1".to_string(),
                finding_type: "XSS".to_string(),
                severity: Severity::Medium,
                description: "Unescaped output".to_string(),
                location: "line 3".to_string(),
                recommendation: "Escape it".to_string(),
            }]),
        }
    }

    #[test]
    fn test_edge_matrix() {
        for from in ALL {
            for to in ALL {
                let expected = matches!(
                    (from, to),
                    (JobStatus::Pending, JobStatus::Processing)
                        | (JobStatus::Processing, JobStatus::Completed)
                        | (JobStatus::Processing, JobStatus::Failed)
                        | (JobStatus::Pending, JobStatus::Failed)
                );
                assert_eq!(
                    can_transition(from, to),
                    expected,
                    "edge {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_no_edges_out_of_terminal_states() {
        for from in [JobStatus::Completed, JobStatus::Failed] {
            for to in ALL {
                assert!(!can_transition(from, to), "edge {from} -> {to}");
            }
        }
    }

    #[test]
    fn test_allowed_prior_states_match_edges() {
        for to in ALL {
            for from in ALL {
                assert_eq!(
                    allowed_prior_states(to).contains(&from),
                    can_transition(from, to)
                );
            }
        }
    }

    #[test]
    fn test_completion_requires_classification() {
        let req = TransitionRequest {
            classification: None,
            ..completion()
        };
        assert!(matches!(req.validate(), Err(Error::Validation(_))));

        let req = TransitionRequest {
            classification: Some(Classification::Pending),
            ..completion()
        };
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_completion_requires_confidence() {
        let req = TransitionRequest {
            confidence: None,
            ..completion()
        };
        assert!(matches!(req.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_confidence_range_checked() {
        for bad in [-1, 101, 1000] {
            let req = TransitionRequest {
                confidence: Some(bad),
                ..completion()
            };
            assert!(matches!(req.validate(), Err(Error::Validation(_))));
        }
        let req = TransitionRequest {
            confidence: Some(100),
            ..completion()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_apply_full_lifecycle() {
        let mut job = pending_job();

        apply_transition(&mut job, &TransitionRequest::to_status(JobStatus::Processing)).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.classification, Classification::Pending);

        apply_transition(&mut job, &completion()).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.classification, Classification::Suspicious);
        assert_eq!(job.confidence, 73);
        assert_eq!(job.findings.len(), 1);
    }

    #[test]
    fn test_apply_intake_rejection() {
        let mut job = pending_job();
        apply_transition(&mut job, &TransitionRequest::to_status(JobStatus::Failed)).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[test]
    fn test_invalid_edge_leaves_job_unchanged() {
        let mut job = pending_job();
        let before = job.clone();

        // Skipping processing on the way to completed
        let err = apply_transition(&mut job, &completion()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: JobStatus::Pending,
                to: JobStatus::Completed
            }
        ));
        assert_eq!(job, before);
    }

    #[test]
    fn test_invalid_payload_leaves_job_unchanged() {
        let mut job = pending_job();
        apply_transition(&mut job, &TransitionRequest::to_status(JobStatus::Processing)).unwrap();
        let before = job.clone();

        let req = TransitionRequest {
            confidence: Some(250),
            ..completion()
        };
        assert!(apply_transition(&mut job, &req).is_err());
        assert_eq!(job, before);
    }

    #[test]
    fn test_completion_overwrites_findings() {
        let mut job = pending_job();
        apply_transition(&mut job, &TransitionRequest::to_status(JobStatus::Processing)).unwrap();

        // Pre-existing set is replaced, not appended to
        job.findings = completion().findings.unwrap();
        let mut second = completion();
        if let Some(findings) = &mut second.findings {
            findings[0].id = "f2".to_string();
        }
        apply_transition(&mut job, &second).unwrap();
        assert_eq!(job.findings.len(), 1);
        assert_eq!(job.findings[0].id, "f2");
    }
}
