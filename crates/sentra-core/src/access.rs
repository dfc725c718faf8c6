//! Owner access gate.
//!
//! Every owner-scoped operation (status, results, export) runs the
//! same check: look up the target, then compare its owner field to the
//! caller. The check is factored here exactly once so the policy
//! cannot drift between endpoints.
//!
//! Policy: existence is checked before ownership, and a non-owner
//! receives `Forbidden` rather than a masking `NotFound`. The store
//! lookup produces the `NotFound` half; this function produces the
//! `Forbidden` half.

use crate::error::{Error, Result};
use crate::models::Job;

/// Fail with [`Error::Forbidden`] unless `caller_id` owns the job.
pub fn ensure_owner(job: &Job, caller_id: &str) -> Result<()> {
    if job.owner_id != caller_id {
        return Err(Error::Forbidden(
            "caller is not the owner of this job".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewJob;

    #[test]
    fn test_owner_passes() {
        let job = NewJob::new("u1", "text", "a.txt", "uploads/u1/a.txt")
            .unwrap()
            .into_job();
        assert!(ensure_owner(&job, "u1").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let job = NewJob::new("u1", "text", "a.txt", "uploads/u1/a.txt")
            .unwrap()
            .into_job();
        let err = ensure_owner(&job, "u2").unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_owner_comparison_is_exact() {
        let job = NewJob::new("u1", "text", "a.txt", "uploads/u1/a.txt")
            .unwrap()
            .into_job();
        assert!(ensure_owner(&job, "U1").is_err());
        assert!(ensure_owner(&job, "u1 ").is_err());
    }
}
