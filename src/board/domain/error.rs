//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// Error returned while parsing a task status from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing a task priority from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Errors returned while validating a blob key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlobKeyError {
    /// The key is empty after trimming.
    #[error("blob key must not be empty")]
    Empty,

    /// The key exceeds the maximum length.
    #[error("blob key '{0}' exceeds {max} characters", max = super::BlobKey::MAX_LEN)]
    TooLong(String),

    /// The key contains characters outside `[A-Za-z0-9_-]`.
    #[error("blob key '{0}' may only contain ASCII letters, digits, '-' and '_'")]
    InvalidCharacters(String),
}
