//! DecisionStore trait: the abstract interface for the decision cache.
//!
//! This trait keeps the reconciler storage-agnostic. Implementations
//! include SQLite (persistent) and in-memory (for tests and embedding).

use std::collections::BTreeSet;
use std::sync::Arc;

use scoped_access_core::{Decision, PermissionStatus, Volume};

use crate::error::Result;

/// The DecisionStore trait: synchronous interface for cached decisions.
///
/// # Design Notes
///
/// - **One status per location**: `(package, volume, directory)` is unique;
///   `set_status` overwrites any previous status.
/// - **Deterministic reads**: `all_decisions` returns decisions ordered by
///   package, then volume (primary first), then directory key.
/// - **External naming**: directories cross this interface by their
///   external name; `None` is the whole volume. Implementations may key
///   them internally however they like.
pub trait DecisionStore: Send + Sync {
    /// Get every cached decision.
    fn all_decisions(&self) -> Result<Vec<Decision>>;

    /// Record the status for a location, replacing any previous status.
    fn set_status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> Result<()>;

    /// Get the status recorded for a location, if any.
    fn status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
    ) -> Result<Option<PermissionStatus>>;

    /// Remove every decision for a package. Returns how many were removed.
    fn clear_package(&self, package: &str) -> Result<usize>;

    /// Get every package with at least one cached decision.
    fn all_packages(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .all_decisions()?
            .into_iter()
            .map(|d| d.package)
            .collect())
    }
}

impl<S: DecisionStore + ?Sized> DecisionStore for Arc<S> {
    fn all_decisions(&self) -> Result<Vec<Decision>> {
        (**self).all_decisions()
    }

    fn set_status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> Result<()> {
        (**self).set_status(package, volume, directory, status)
    }

    fn status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
    ) -> Result<Option<PermissionStatus>> {
        (**self).status(package, volume, directory)
    }

    fn clear_package(&self, package: &str) -> Result<usize> {
        (**self).clear_package(package)
    }

    fn all_packages(&self) -> Result<BTreeSet<String>> {
        (**self).all_packages()
    }
}
