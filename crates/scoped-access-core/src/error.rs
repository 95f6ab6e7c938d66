//! Error types for the scoped access core.

use thiserror::Error;

/// Errors raised when constructing core values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("package name cannot be empty")]
    EmptyPackage,

    #[error("external volume id cannot be empty")]
    EmptyVolumeId,

    #[error("a grant must name an external volume or a directory on the primary volume")]
    WholePrimaryVolume,

    #[error("unknown permission status code: {0}")]
    UnknownStatusCode(i32),

    #[error("unknown permission status: {0}")]
    UnknownStatus(String),

    #[error("not a standard directory: {0}")]
    UnknownDirectory(String),

    #[error("invalid locator {locator}: {reason}")]
    InvalidLocator { locator: String, reason: String },
}

/// Why the parser dropped a raw grant entry.
///
/// Rejections are diagnostics, not failures: the parser never returns them
/// as `Err` from a batch parse.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    #[error("entry has no package name")]
    MissingPackage,

    #[error("wrong authority")]
    WrongAuthority,

    #[error("wrong path segments")]
    TooFewSegments,

    #[error("wrong path tree")]
    NotATree,

    #[error("could not parse volume and directory")]
    BadVolumeSplit,

    #[error("empty volume token")]
    EmptyVolume,

    #[error("volume and directory are both absent")]
    WholePrimaryVolume,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
