//! In-memory implementation of the DecisionStore trait.
//!
//! Same semantics as SQLite but keeps everything in memory with no
//! persistence. Used by tests and by embedders that own persistence.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use scoped_access_core::{
    external_directory_name, internal_directory_name, Decision, PermissionStatus, Volume,
};

use crate::error::{Result, StoreError};
use crate::traits::DecisionStore;

/// In-memory decision store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryDecisionStore {
    decisions: RwLock<BTreeMap<DecisionKey, PermissionStatus>>,
}

/// Unique location of a decision, with the directory under its internal name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct DecisionKey {
    package: String,
    volume: Volume,
    directory: String,
}

impl DecisionKey {
    fn new(package: &str, volume: &Volume, directory: Option<&str>) -> Self {
        Self {
            package: package.to_string(),
            volume: volume.clone(),
            directory: internal_directory_name(directory).to_string(),
        }
    }

    fn to_decision(&self, status: PermissionStatus) -> Decision {
        Decision::new(
            self.package.clone(),
            self.volume.clone(),
            external_directory_name(&self.directory),
            status,
        )
    }
}

impl MemoryDecisionStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with decisions. Later duplicates win.
    pub fn with_decisions<I>(decisions: I) -> Self
    where
        I: IntoIterator<Item = Decision>,
    {
        let map = decisions
            .into_iter()
            .map(|d| {
                (
                    DecisionKey::new(&d.package, &d.volume, d.directory.as_deref()),
                    d.status,
                )
            })
            .collect();
        Self {
            decisions: RwLock::new(map),
        }
    }

    /// Number of cached decisions.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Check if the store holds no decisions.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<DecisionKey, PermissionStatus>>> {
        self.decisions
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<DecisionKey, PermissionStatus>>> {
        self.decisions
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {}", e)))
    }
}

impl DecisionStore for MemoryDecisionStore {
    fn all_decisions(&self) -> Result<Vec<Decision>> {
        let decisions = self.read()?;
        Ok(decisions
            .iter()
            .map(|(key, status)| key.to_decision(*status))
            .collect())
    }

    fn set_status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> Result<()> {
        let mut decisions = self.write()?;
        decisions.insert(DecisionKey::new(package, volume, directory), status);
        Ok(())
    }

    fn status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
    ) -> Result<Option<PermissionStatus>> {
        let decisions = self.read()?;
        Ok(decisions
            .get(&DecisionKey::new(package, volume, directory))
            .copied())
    }

    fn clear_package(&self, package: &str) -> Result<usize> {
        let mut decisions = self.write()?;
        let before = decisions.len();
        decisions.retain(|key, _| key.package != package);
        Ok(before - decisions.len())
    }

    fn all_packages(&self) -> Result<BTreeSet<String>> {
        let decisions = self.read()?;
        Ok(decisions.keys().map(|k| k.package.clone()).collect())
    }
}
