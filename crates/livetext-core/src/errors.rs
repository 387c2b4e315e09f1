//! Core error types.

use thiserror::Error;

use crate::ids::SubjectId;

/// Errors raised by the subject store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The handle refers to a subject the host has already released.
    #[error("subject {0} is no longer alive")]
    StaleSubject(SubjectId),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
