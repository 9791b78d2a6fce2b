//! Posting error model.

use thiserror::Error;

/// Result type used across the posting core.
pub type PostingResult<T> = Result<T, PostingError>;

/// Failure taxonomy for ledger and journal posting.
///
/// Keep this focused on the four classes callers must distinguish. Zero-effect
/// events are NOT errors; they surface as a `Skipped` outcome in the posting
/// crate instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostingError {
    /// A required chart-of-accounts entry is missing or inactive for the
    /// tenant. Not retryable: the business cannot post until setup is fixed.
    #[error("{0}")]
    Configuration(String),

    /// The input is malformed (unbalanced lines, bad posting date, negative
    /// amounts). All violations are collected, never short-circuited.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// An underlying store write failed. Triggers compensation when it occurs
    /// after a journal header was already written.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// Compensation itself failed, leaving financial records inconsistent
    /// with inventory records. Alertable; never retried.
    #[error("unrecoverable: {0}")]
    Unrecoverable(String),
}

impl PostingError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn unrecoverable(msg: impl Into<String>) -> Self {
        Self::Unrecoverable(msg.into())
    }

    /// Standard message shape for a missing account, e.g.
    /// `Cost of Goods Sold account (C-5000) not found`.
    pub fn account_not_found(name: &str, code: &str) -> Self {
        Self::Configuration(format!("{name} account ({code}) not found"))
    }
}
