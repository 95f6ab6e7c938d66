//! Error types for the permissions module.

use thiserror::Error;

use scoped_access_core::CoreError;
use scoped_access_store::StoreError;

/// Errors reported by a grant registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry cannot serve requests.
    #[error("grant registry unavailable: {0}")]
    Unavailable(String),

    /// A grant was recorded with a locator that is not a valid URI.
    #[error("invalid grant locator: {0}")]
    InvalidLocator(#[from] CoreError),
}

/// Errors that can occur while reconciling grants with decisions.
///
/// Both variants are upstream failures; they are propagated unmodified.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The decision store failed.
    #[error("decision store error: {0}")]
    Store(#[from] StoreError),

    /// The grant registry failed.
    #[error("grant registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type for reconciler operations.
pub type Result<T> = std::result::Result<T, ReconcileError>;
