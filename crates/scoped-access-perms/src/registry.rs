//! Grant registry abstraction.
//!
//! The registry is the authority on which grants are currently in effect.
//! The reconciler only reads from it; recording and revoking grants is the
//! registry owner's business.

use std::sync::Arc;

use scoped_access_core::RawGrantEntry;

use crate::error::RegistryError;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Read-only view of the active grants.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait GrantRegistry: Send + Sync {
    /// Get the raw grant entries held by `package`, or by every package
    /// when `package` is `None`.
    ///
    /// Entries are returned undecoded and may include grants for
    /// unrelated authorities.
    fn active_grants_for(&self, package: Option<&str>) -> Result<Vec<RawGrantEntry>>;
}

impl<R: GrantRegistry + ?Sized> GrantRegistry for Arc<R> {
    fn active_grants_for(&self, package: Option<&str>) -> Result<Vec<RawGrantEntry>> {
        (**self).active_grants_for(package)
    }
}

/// A simple in-memory registry for tests and embedders.
pub mod memory {
    use super::*;
    use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

    /// In-memory grant registry. Entries are kept in insertion order.
    #[derive(Debug, Default)]
    pub struct MemoryGrantRegistry {
        entries: RwLock<Vec<RawGrantEntry>>,
    }

    impl MemoryGrantRegistry {
        /// Create an empty registry.
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a registry holding the given entries.
        pub fn with_entries<I>(entries: I) -> Self
        where
            I: IntoIterator<Item = RawGrantEntry>,
        {
            Self {
                entries: RwLock::new(entries.into_iter().collect()),
            }
        }

        /// Record a grant of `uri` to `package`.
        pub fn grant(&self, package: &str, uri: &str) -> Result<()> {
            let entry = RawGrantEntry::from_uri(package, uri)?;
            self.grant_entry(entry)
        }

        /// Record an already-built entry.
        pub fn grant_entry(&self, entry: RawGrantEntry) -> Result<()> {
            self.write()?.push(entry);
            Ok(())
        }

        /// Drop every grant held by `package`. Returns how many were removed.
        pub fn revoke_package(&self, package: &str) -> Result<usize> {
            let mut entries = self.write()?;
            let before = entries.len();
            entries.retain(|e| e.package != package);
            Ok(before - entries.len())
        }

        /// Number of recorded entries.
        pub fn len(&self) -> Result<usize> {
            Ok(self.read()?.len())
        }

        /// Check if no grants are recorded.
        pub fn is_empty(&self) -> Result<bool> {
            Ok(self.read()?.is_empty())
        }

        fn read(&self) -> Result<RwLockReadGuard<'_, Vec<RawGrantEntry>>> {
            self.entries
                .read()
                .map_err(|e| RegistryError::Unavailable(format!("lock poisoned: {}", e)))
        }

        fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<RawGrantEntry>>> {
            self.entries
                .write()
                .map_err(|e| RegistryError::Unavailable(format!("lock poisoned: {}", e)))
        }
    }

    impl GrantRegistry for MemoryGrantRegistry {
        fn active_grants_for(&self, package: Option<&str>) -> Result<Vec<RawGrantEntry>> {
            let entries = self.read()?;
            Ok(match package {
                Some(package) => entries
                    .iter()
                    .filter(|e| e.package == package)
                    .cloned()
                    .collect(),
                None => entries.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryGrantRegistry;
    use super::*;

    const TREE_V1: &str = "content://com.android.externalstorage.documents/tree/V1";
    const TREE_MUSIC: &str = "content://com.android.externalstorage.documents/tree/primary%3AMusic";

    #[test]
    fn test_filter_by_package() {
        let registry = MemoryGrantRegistry::new();
        registry.grant("com.a", TREE_V1).unwrap();
        registry.grant("com.b", TREE_MUSIC).unwrap();
        registry.grant("com.a", TREE_MUSIC).unwrap();

        let a = registry.active_grants_for(Some("com.a")).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].path, "/tree/V1");
        assert_eq!(a[1].path, "/tree/primary%3AMusic");

        assert_eq!(registry.active_grants_for(None).unwrap().len(), 3);
        assert!(registry.active_grants_for(Some("com.c")).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_uri_is_rejected() {
        let registry = MemoryGrantRegistry::new();
        let result = registry.grant("com.a", "not a uri");
        assert!(matches!(result, Err(RegistryError::InvalidLocator(_))));
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn test_revoke_package() {
        let registry = MemoryGrantRegistry::with_entries(vec![
            RawGrantEntry::new("com.a", "auth", "/tree/V1"),
            RawGrantEntry::new("com.b", "auth", "/tree/V2"),
            RawGrantEntry::new("com.a", "auth", "/tree/V3"),
        ]);

        assert_eq!(registry.revoke_package("com.a").unwrap(), 2);
        assert_eq!(registry.len().unwrap(), 1);
        assert_eq!(registry.revoke_package("com.a").unwrap(), 0);
    }

    #[test]
    fn test_shared_registry_sees_new_grants() {
        let registry = Arc::new(MemoryGrantRegistry::new());
        let view: Arc<MemoryGrantRegistry> = Arc::clone(&registry);

        registry.grant("com.a", TREE_V1).unwrap();
        assert_eq!(view.active_grants_for(Some("com.a")).unwrap().len(), 1);
    }
}
