//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use scoped_access_core::{Decision, LocatorScheme, PermissionStatus, RawGrantEntry, Volume};
use scoped_access_perms::{
    registry, GrantRegistry, MemoryGrantRegistry, Reconciler, RegistryError,
};
use scoped_access_store::{DecisionStore, MemoryDecisionStore, StoreError};

/// Build the raw registry entry for a tree grant under the default scheme.
///
/// `tree_entry("p", &Volume::Primary, Some("Music"))` yields the entry for
/// `content://com.android.externalstorage.documents/tree/primary%3AMusic`.
pub fn tree_entry(package: &str, volume: &Volume, directory: Option<&str>) -> RawGrantEntry {
    let scheme = LocatorScheme::default();
    let root = volume.uuid().unwrap_or(&scheme.primary_root);
    let tree_id = match directory {
        Some(dir) => format!("{}%3A{}", root, dir),
        None => root.to_string(),
    };
    RawGrantEntry::new(
        package,
        scheme.storage_authority,
        format!("/{}/{}", scheme.tree_marker, tree_id),
    )
}

/// The content URI of a tree grant under the default scheme.
pub fn tree_uri(volume: &Volume, directory: Option<&str>) -> String {
    let entry = tree_entry("", volume, directory);
    format!("content://{}{}", entry.authority, entry.path)
}

/// A test fixture with shared in-memory collaborators.
///
/// The store and registry are behind `Arc`, so the fixture can keep
/// mutating them after handing them to a reconciler or provider.
#[derive(Debug, Default)]
pub struct TestFixture {
    pub store: Arc<MemoryDecisionStore>,
    pub registry: Arc<MemoryGrantRegistry>,
}

impl TestFixture {
    /// Create a fixture with empty sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `package` the whole external volume `volume_id`.
    pub fn grant_volume(&self, package: &str, volume_id: &str) -> &Self {
        self.grant(package, &Volume::External(volume_id.to_string()), None)
    }

    /// Grant `package` a single directory.
    pub fn grant_directory(&self, package: &str, volume: &Volume, directory: &str) -> &Self {
        self.grant(package, volume, Some(directory))
    }

    /// Record a raw tree grant; the whole primary volume is recorded as-is
    /// so parsers can reject it.
    pub fn grant(&self, package: &str, volume: &Volume, directory: Option<&str>) -> &Self {
        self.grant_raw(tree_entry(package, volume, directory))
    }

    /// Record an arbitrary registry entry.
    pub fn grant_raw(&self, entry: RawGrantEntry) -> &Self {
        self.registry
            .grant_entry(entry)
            .expect("memory registry is never poisoned in tests");
        self
    }

    /// Cache a decision.
    pub fn decide(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> &Self {
        self.store
            .set_status(package, volume, directory, status)
            .expect("memory store is never poisoned in tests");
        self
    }

    /// Cache a `NeverAsk` decision.
    pub fn deny(&self, package: &str, volume: &Volume, directory: Option<&str>) -> &Self {
        self.decide(package, volume, directory, PermissionStatus::NeverAsk)
    }

    /// Cache a batch of decisions.
    pub fn decide_all<'a, I>(&self, decisions: I) -> &Self
    where
        I: IntoIterator<Item = &'a Decision>,
    {
        for d in decisions {
            self.decide(&d.package, &d.volume, d.directory.as_deref(), d.status);
        }
        self
    }

    /// A reconciler over this fixture's sources.
    pub fn reconciler(&self) -> Reconciler<Arc<MemoryDecisionStore>, Arc<MemoryGrantRegistry>> {
        Reconciler::new(Arc::clone(&self.store), Arc::clone(&self.registry))
    }
}

/// A decision store whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl DecisionStore for UnavailableStore {
    fn all_decisions(&self) -> scoped_access_store::Result<Vec<Decision>> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    fn set_status(
        &self,
        _package: &str,
        _volume: &Volume,
        _directory: Option<&str>,
        _status: PermissionStatus,
    ) -> scoped_access_store::Result<()> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    fn status(
        &self,
        _package: &str,
        _volume: &Volume,
        _directory: Option<&str>,
    ) -> scoped_access_store::Result<Option<PermissionStatus>> {
        Err(StoreError::Unavailable("store offline".into()))
    }

    fn clear_package(&self, _package: &str) -> scoped_access_store::Result<usize> {
        Err(StoreError::Unavailable("store offline".into()))
    }
}

/// A grant registry whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRegistry;

impl GrantRegistry for UnavailableRegistry {
    fn active_grants_for(&self, _package: Option<&str>) -> registry::Result<Vec<RawGrantEntry>> {
        Err(RegistryError::Unavailable("registry offline".into()))
    }
}
