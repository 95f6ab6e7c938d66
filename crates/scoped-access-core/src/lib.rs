//! # Scoped Access Core
//!
//! Pure primitives for scoped access reconciliation: storage locations,
//! active grants, cached decisions, and the rows the reconciler emits.
//!
//! This crate contains no I/O and no storage. It is pure computation over
//! permission records.
//!
//! ## Key Types
//!
//! - [`Volume`] - The primary volume or an external volume id
//! - [`Grant`] - An active permission held by a package
//! - [`Decision`] - A cached response to a permission prompt
//! - [`RawGrantEntry`] - An undecoded entry from the grant registry
//! - [`PermissionRow`] / [`PackageRow`] - Reconciled output rows
//!
//! ## Parsing
//!
//! Raw registry entries are decoded with [`GrantRecordParser`]. See the
//! [`parser`] module.

pub mod decision;
pub mod error;
pub mod grant;
pub mod parser;
pub mod row;
pub mod types;

pub use decision::{Decision, PermissionStatus};
pub use error::{CoreError, RejectReason, Result};
pub use grant::{Grant, RawGrantEntry};
pub use parser::{GrantRecordParser, LocatorScheme, ParseOutcome, Rejected};
pub use row::{PackageRow, PermissionRow, PACKAGES_COLUMNS, PERMISSIONS_COLUMNS};
pub use types::{
    external_directory_name, internal_directory_name, StandardDirectory, Volume, ROOT_DIRECTORY,
};
