//! Core traits for sentra abstractions.
//!
//! These traits define the seams between the lifecycle core and its
//! collaborators — durable stores and the external identity provider —
//! enabling pluggable backends and fakes in tests. Dependencies are
//! constructed explicitly and injected at setup; there is no global
//! store or verifier handle.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::lifecycle::TransitionRequest;
use crate::models::{Feedback, Job, NewFeedback, NewJob};

/// Durable keyed storage for job records.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new pending job. Creation is atomic; ids never
    /// collide (UUIDv7).
    async fn create(&self, new: NewJob) -> Result<Job>;

    /// Fetch a job by id. `Ok(None)` when no such job exists.
    async fn get(&self, job_id: Uuid) -> Result<Option<Job>>;

    /// List jobs for one owner, most recent first (`created_at` desc,
    /// `id` desc tiebreak). A non-positive `limit` falls back to
    /// [`crate::models::DEFAULT_LIST_LIMIT`]. Restartable: re-calling
    /// produces the sequence afresh, no continuation token.
    async fn list_for_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<Job>>;

    /// Move a job along one lifecycle edge and return the updated
    /// record.
    ///
    /// Must be a conditional write on the expected prior status so
    /// concurrent transitions on the same job serialize: exactly one
    /// of two racers succeeds, the loser gets
    /// [`crate::Error::InvalidTransition`]. A reader never observes a
    /// partially applied transition. Fails with
    /// [`crate::Error::NotFound`] when the job does not exist.
    async fn transition(&self, job_id: Uuid, req: TransitionRequest) -> Result<Job>;
}

/// Durable storage for feedback records. Append-only: there is no
/// update or delete.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Insert a new feedback record. Always creates; multiple records
    /// per finding are expected.
    async fn insert(&self, new: NewFeedback) -> Result<Feedback>;
}

/// A verified identity, as reported by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Stable subject identifier; the value stored as a job's owner.
    pub subject_id: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

/// External identity verifier: bearer credential in, verified subject
/// out. Consumed, not specified — failures surface as
/// [`crate::Error::Unauthenticated`].
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Subject>;
}
