//! # sentra-db
//!
//! Store layer for sentra.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL implementations of the job and feedback stores
//! - In-memory implementations for tests and local development
//!
//! ## Example
//!
//! ```rust,ignore
//! use sentra_db::Database;
//! use sentra_core::NewJob;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/sentra").await?;
//!
//!     let job = db.jobs.create(NewJob::new(
//!         "user-1", "code", "app.py", "uploads/user-1/app.py",
//!     )?).await?;
//!
//!     println!("Created job: {}", job.id);
//!     Ok(())
//! }
//! ```

pub mod feedback;
pub mod jobs;
pub mod memory;
pub mod pool;

use std::sync::Arc;

use tracing::info;

use sentra_core::{FeedbackStore, JobStore, Result};

pub use feedback::PgFeedbackStore;
pub use jobs::PgJobStore;
pub use memory::{MemoryFeedbackStore, MemoryJobStore};
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

// Re-export core types
pub use sentra_core::*;

/// Aggregate handle over the stores, injected into the API layer.
#[derive(Clone)]
pub struct Database {
    pub jobs: Arc<dyn JobStore>,
    pub feedback: Arc<dyn FeedbackStore>,
}

impl Database {
    /// Connect to PostgreSQL and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Database(e.into()))?;
        info!("Database migrations complete");

        Ok(Self {
            jobs: Arc::new(PgJobStore::new(pool.clone())),
            feedback: Arc::new(PgFeedbackStore::new(pool)),
        })
    }

    /// Construct a database backed by in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            jobs: Arc::new(MemoryJobStore::new()),
            feedback: Arc::new(MemoryFeedbackStore::new()),
        }
    }
}
