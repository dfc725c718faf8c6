//! # sentra-core
//!
//! Core types, traits, and abstractions for sentra, the content-scan
//! intake and status-tracking service.
//!
//! This crate defines:
//! - The domain model (jobs, findings, feedback)
//! - The job lifecycle transition contract
//! - The owner access gate
//! - Store and identity-verifier traits for pluggable backends
//! - The error taxonomy shared by every crate in the workspace

pub mod access;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod traits;

pub use access::ensure_owner;
pub use error::{Error, Result};
pub use lifecycle::{allowed_prior_states, apply_transition, can_transition, TransitionRequest};
pub use models::{
    Classification, Feedback, FeedbackLabel, FileType, Finding, Job, JobStatus, JobStatusSummary,
    NewFeedback, NewJob, Severity, DEFAULT_LIST_LIMIT,
};
pub use traits::{FeedbackStore, IdentityVerifier, JobStore, Subject};

/// Generate a new UUIDv7 (time-ordered).
///
/// Used for all entity identifiers: time-ordered ids sort
/// chronologically, which gives `created_at DESC, id DESC` listings a
/// deterministic tiebreak for free.
pub fn new_v7() -> uuid::Uuid {
    uuid::Uuid::now_v7()
}
