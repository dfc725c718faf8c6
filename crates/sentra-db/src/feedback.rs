//! PostgreSQL feedback store implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use sentra_core::{Error, Feedback, NewFeedback, Result};

/// PostgreSQL implementation of [`sentra_core::FeedbackStore`].
///
/// The table is append-only: every submission inserts a fresh row, and
/// no update or delete statement exists in this store.
pub struct PgFeedbackStore {
    pool: Pool<Postgres>,
}

impl PgFeedbackStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl sentra_core::FeedbackStore for PgFeedbackStore {
    async fn insert(&self, new: NewFeedback) -> Result<Feedback> {
        let feedback = new.into_feedback();

        sqlx::query(
            "INSERT INTO feedback (id, job_id, finding_id, user_id, label, note, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(feedback.id)
        .bind(feedback.job_id)
        .bind(&feedback.finding_id)
        .bind(&feedback.user_id)
        .bind(feedback.label.as_str())
        .bind(&feedback.note)
        .bind(feedback.created_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(feedback)
    }
}
