//! Error types for the provider.

use scoped_access_perms::ReconcileError;
use thiserror::Error;

/// Errors surfaced to callers of the provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request is malformed: missing filter, wrong argument count, bad value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation or table is not supported.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The grant registry or decision store failed.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] ReconcileError),

    /// Writing diagnostic output failed.
    #[error("failed to write dump: {0}")]
    Output(#[from] std::fmt::Error),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
