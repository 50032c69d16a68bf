//! Error types for taskdeck
//!
//! Failure taxonomy:
//! - `StoreUnavailable`: the network/store call itself failed
//! - `TaskNotFound`: a referenced task id no longer exists
//! - `InvalidInput`: validation caught at the form boundary, before any
//!   store call
//!
//! User-facing copy lives in the view-model layer; these variants carry the
//! diagnostic detail.

use thiserror::Error;

/// Main error type for taskdeck operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether re-triggering the same operation can reasonably succeed.
    ///
    /// Every repository failure is surfaced as a retryable message; only
    /// validation errors are bounced back to the form instead.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Error::InvalidInput(_))
    }
}

/// Result type alias for taskdeck operations
pub type Result<T> = std::result::Result<T, Error>;
