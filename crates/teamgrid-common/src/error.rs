//! Error types for Teamgrid
//!
//! `ScheduleError` is the domain error shared by the timeline engine, the
//! persistence layer, and the HTTP handlers. Services propagate it through
//! `anyhow::Result` and the server maps it onto response statuses.

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum ScheduleError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("{0} '{1}' not found")]
    NotFound(&'static str, i64),

    #[error("date range overlaps assignment group '{0}'")]
    GroupOverlap(i64),

    #[error("moved range length differs from source range length")]
    ShapeMismatch,

    #[error("range [{0}, {1}] is not a contiguous block of assigned days")]
    NotABlock(String, String),

    #[error("assignment for project '{0}' and member '{1}' already exists")]
    DuplicateAssignment(i64, i64),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}
