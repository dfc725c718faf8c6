//! In-memory store implementations for tests and local development.
//!
//! These fakes sit behind the same traits as the PostgreSQL stores.
//! The job map lives behind a single mutex: a transition validates and
//! applies inside one critical section, which gives the same
//! serialization guarantee the Postgres store gets from its
//! conditional UPDATE — of two racing transitions exactly one wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use sentra_core::{
    apply_transition, Error, Feedback, Job, NewFeedback, NewJob, Result, TransitionRequest,
    DEFAULT_LIST_LIMIT,
};

/// In-memory implementation of [`sentra_core::JobStore`].
#[derive(Clone, Default)]
pub struct MemoryJobStore {
    jobs: Arc<Mutex<HashMap<Uuid, Job>>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored jobs (test helper).
    pub fn len(&self) -> usize {
        self.jobs.lock().expect("job store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl sentra_core::JobStore for MemoryJobStore {
    async fn create(&self, new: NewJob) -> Result<Job> {
        let job = new.into_job();
        let mut jobs = self.jobs.lock().expect("job store lock poisoned");
        jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Job>> {
        let jobs = self.jobs.lock().expect("job store lock poisoned");
        Ok(jobs.get(&job_id).cloned())
    }

    async fn list_for_owner(&self, owner_id: &str, limit: i64) -> Result<Vec<Job>> {
        let limit = if limit > 0 { limit } else { DEFAULT_LIST_LIMIT };
        let jobs = self.jobs.lock().expect("job store lock poisoned");

        let mut owned: Vec<Job> = jobs
            .values()
            .filter(|job| job.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        owned.truncate(limit as usize);
        Ok(owned)
    }

    async fn transition(&self, job_id: Uuid, req: TransitionRequest) -> Result<Job> {
        let mut jobs = self.jobs.lock().expect("job store lock poisoned");
        let job = jobs
            .get_mut(&job_id)
            .ok_or_else(|| Error::NotFound(format!("job {job_id}")))?;
        apply_transition(job, &req)?;
        Ok(job.clone())
    }
}

/// In-memory implementation of [`sentra_core::FeedbackStore`].
#[derive(Clone, Default)]
pub struct MemoryFeedbackStore {
    records: Arc<Mutex<Vec<Feedback>>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored records in insertion order (test helper).
    pub fn all(&self) -> Vec<Feedback> {
        self.records
            .lock()
            .expect("feedback store lock poisoned")
            .clone()
    }
}

#[async_trait]
impl sentra_core::FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, new: NewFeedback) -> Result<Feedback> {
        let feedback = new.into_feedback();
        let mut records = self.records.lock().expect("feedback store lock poisoned");
        records.push(feedback.clone());
        Ok(feedback)
    }
}
