//! Structured logging schema and field name constants for sentra.
//!
//! All crates use these constants for consistent structured logging
//! fields, so log aggregation tools can query by standardized names
//! across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue or contract violation (engine defects) |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, authenticated subjects, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request handling.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "core"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "submit", "get_status", "transition", "export"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Job UUID being operated on.
pub const JOB_ID: &str = "job_id";

/// Verified subject id of the caller.
pub const SUBJECT_ID: &str = "subject_id";

/// Feedback UUID created by a feedback submission.
pub const FEEDBACK_ID: &str = "feedback_id";

/// Lifecycle status involved in a transition.
pub const JOB_STATUS: &str = "job_status";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of findings attached by a completion transition.
pub const FINDING_COUNT: &str = "finding_count";
