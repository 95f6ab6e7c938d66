//! Reconciliation of active grants with cached decisions.
//!
//! The registry is ground truth: a cached decision may be stale, but it
//! must never report a denial for a location an active grant covers. The
//! reconciler holds no state of its own; every call re-reads both sources.

use std::collections::BTreeSet;

use scoped_access_core::{
    Grant, GrantRecordParser, LocatorScheme, PermissionRow, PermissionStatus, Volume,
};
use scoped_access_store::DecisionStore;

use crate::error::Result;
use crate::partition::{partition, GrantPartition};
use crate::registry::GrantRegistry;

/// Result of a permission update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The decision was recorded.
    Applied,
    /// Revoking is not supported; nothing changed.
    RevokeUnsupported,
}

impl UpdateOutcome {
    /// Number of rows affected, as reported by a table update.
    pub fn rows_affected(self) -> usize {
        match self {
            UpdateOutcome::Applied => 1,
            UpdateOutcome::RevokeUnsupported => 0,
        }
    }
}

/// Merges the grant registry and the decision store into permission rows.
#[derive(Debug)]
pub struct Reconciler<S, R> {
    store: S,
    registry: R,
    parser: GrantRecordParser,
}

impl<S: DecisionStore, R: GrantRegistry> Reconciler<S, R> {
    /// Create a reconciler using the default locator scheme.
    pub fn new(store: S, registry: R) -> Self {
        Self::with_scheme(store, registry, LocatorScheme::default())
    }

    /// Create a reconciler that decodes grants with a custom scheme.
    pub fn with_scheme(store: S, registry: R, scheme: LocatorScheme) -> Self {
        Self {
            store,
            registry,
            parser: GrantRecordParser::new(scheme),
        }
    }

    /// The decision store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The grant registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The grant parser.
    pub fn parser(&self) -> &GrantRecordParser {
        &self.parser
    }

    /// Every package with a cached decision or an active grant.
    ///
    /// Returns `None` when neither source knows any package.
    pub fn list_packages(&self) -> Result<Option<BTreeSet<String>>> {
        let mut packages = self.store.all_packages()?;

        // Raw entries count even if they would not parse.
        let entries = self.registry.active_grants_for(None)?;
        packages.extend(entries.into_iter().map(|e| e.package));

        tracing::debug!(count = packages.len(), "listed packages");

        if packages.is_empty() {
            Ok(None)
        } else {
            Ok(Some(packages))
        }
    }

    /// The reconciled permissions of `package`.
    ///
    /// Rows come in three groups: whole-volume grants, directory grants on
    /// volumes without a whole-volume grant, then cached denials no active
    /// grant covers.
    pub fn list_permissions(&self, package: &str) -> Result<Vec<PermissionRow>> {
        let grants = self.active_grants(package)?;
        let partition = partition(&grants);
        for ignored in &partition.ignored {
            tracing::warn!(
                grant = %ignored.grant,
                reason = ?ignored.reason,
                "ignoring grant for non-standard directory"
            );
        }

        let mut rows = Vec::new();
        self.emit_grants(package, &partition, &mut rows);
        self.emit_denials(package, &partition, &mut rows)?;

        tracing::debug!(package, rows = rows.len(), "listed permissions");
        Ok(rows)
    }

    /// Record a response to a permission prompt.
    ///
    /// A granted response is cached as `Ask` so the user is prompted again
    /// next time; the active grant itself lives in the registry. Revoking is
    /// not supported and leaves the store untouched.
    pub fn apply_grant(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        granted: bool,
    ) -> Result<UpdateOutcome> {
        if !granted {
            tracing::warn!(package, %volume, ?directory, "revoking scoped access is not supported");
            return Ok(UpdateOutcome::RevokeUnsupported);
        }

        self.store
            .set_status(package, volume, directory, PermissionStatus::Ask)?;

        tracing::debug!(package, %volume, ?directory, "reset decision to ask");
        Ok(UpdateOutcome::Applied)
    }

    /// Active grants of `package` that decode as scoped access grants.
    fn active_grants(&self, package: &str) -> Result<Vec<Grant>> {
        let entries = self.registry.active_grants_for(Some(package))?;
        let outcome = self.parser.parse(entries);

        for rejected in &outcome.rejected {
            tracing::warn!(entry = %rejected.entry, reason = %rejected.reason, "rejected grant entry");
        }

        Ok(outcome
            .grants
            .into_iter()
            .filter(|grant| {
                let matches = grant.package() == package;
                if !matches {
                    tracing::debug!(%grant, package, "ignoring grant held by another package");
                }
                matches
            })
            .collect())
    }

    fn emit_grants(&self, package: &str, partition: &GrantPartition, rows: &mut Vec<PermissionRow>) {
        for volume in &partition.granted_volumes {
            rows.push(PermissionRow::granted(package, volume.clone(), None));
        }

        for (volume, dirs) in &partition.granted_dirs {
            if partition.is_volume_granted(volume) {
                for dir in dirs {
                    tracing::warn!(
                        package,
                        %volume,
                        directory = %dir,
                        "ignoring directory grant covered by whole-volume grant"
                    );
                }
                continue;
            }
            for dir in dirs {
                rows.push(PermissionRow::granted(package, volume.clone(), Some(dir)));
            }
        }
    }

    fn emit_denials(
        &self,
        package: &str,
        partition: &GrantPartition,
        rows: &mut Vec<PermissionRow>,
    ) -> Result<()> {
        for decision in self.store.all_decisions()? {
            if decision.package != package {
                continue;
            }
            if !decision.status.is_denial() {
                tracing::debug!(%decision, "ignoring decision without a denial");
                continue;
            }
            if partition.is_volume_granted(&decision.volume) {
                tracing::debug!(%decision, "ignoring denial covered by whole-volume grant");
                continue;
            }
            if partition.covers(&decision.volume, decision.directory.as_deref()) {
                tracing::debug!(%decision, "ignoring denial covered by directory grant");
                continue;
            }

            rows.push(PermissionRow::denied(
                package,
                decision.volume,
                decision.directory.as_deref(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReconcileError, RegistryError};
    use crate::registry::memory::MemoryGrantRegistry;
    use scoped_access_core::{Decision, RawGrantEntry};
    use scoped_access_store::MemoryDecisionStore;

    const PKG: &str = "com.example.pkgX";
    const STORAGE: &str = "content://com.android.externalstorage.documents";

    type TestReconciler = Reconciler<MemoryDecisionStore, MemoryGrantRegistry>;

    fn v1() -> Volume {
        Volume::External("V1".into())
    }

    fn reconciler(decisions: Vec<Decision>, grants: &[(&str, &str)]) -> TestReconciler {
        let registry = MemoryGrantRegistry::new();
        for (package, tree) in grants {
            registry
                .grant(package, &format!("{}/tree/{}", STORAGE, tree))
                .unwrap();
        }
        Reconciler::new(MemoryDecisionStore::with_decisions(decisions), registry)
    }

    fn never_ask(volume: Volume, directory: Option<&str>) -> Decision {
        Decision::new(PKG, volume, directory, PermissionStatus::NeverAsk)
    }

    #[test]
    fn test_cached_denial_without_grants() {
        let r = reconciler(vec![never_ask(Volume::Primary, Some("Download"))], &[]);

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(
            rows,
            vec![PermissionRow::denied(PKG, Volume::Primary, Some("Download"))]
        );
    }

    #[test]
    fn test_whole_volume_grant_suppresses_directory_denials() {
        let r = reconciler(vec![never_ask(v1(), Some("Pictures"))], &[(PKG, "V1")]);

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(rows, vec![PermissionRow::granted(PKG, v1(), None)]);
    }

    #[test]
    fn test_directory_grant_beside_other_denials() {
        let r = reconciler(
            vec![
                never_ask(v1(), Some("Pictures")),
                never_ask(v1(), Some("Movies")),
            ],
            &[(PKG, "V1%3APictures")],
        );

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(
            rows,
            vec![
                PermissionRow::granted(PKG, v1(), Some("Pictures")),
                PermissionRow::denied(PKG, v1(), Some("Movies")),
            ]
        );
    }

    #[test]
    fn test_ask_and_granted_decisions_are_not_reported() {
        let r = reconciler(
            vec![
                Decision::new(PKG, Volume::Primary, Some("Music"), PermissionStatus::Ask),
                Decision::new(PKG, Volume::Primary, Some("DCIM"), PermissionStatus::Granted),
                Decision::new(PKG, Volume::Primary, Some("Movies"), PermissionStatus::AskAgain),
            ],
            &[],
        );

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(
            rows,
            vec![PermissionRow::denied(PKG, Volume::Primary, Some("Movies"))]
        );
    }

    #[test]
    fn test_redundant_directory_grants_are_suppressed() {
        let r = reconciler(vec![], &[(PKG, "V1%3AMusic"), (PKG, "V1"), (PKG, "primary%3AMusic")]);

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(
            rows,
            vec![
                PermissionRow::granted(PKG, v1(), None),
                PermissionRow::granted(PKG, Volume::Primary, Some("Music")),
            ]
        );
    }

    #[test]
    fn test_non_standard_and_malformed_grants_produce_no_rows() {
        let registry = MemoryGrantRegistry::with_entries(vec![
            RawGrantEntry::new(PKG, "com.android.externalstorage.documents", "/tree/primary%3ASecrets"),
            RawGrantEntry::new(PKG, "com.other.provider", "/tree/V1"),
            RawGrantEntry::new(PKG, "com.android.externalstorage.documents", "/tree"),
            RawGrantEntry::new(PKG, "com.android.externalstorage.documents", "/document/V1"),
        ]);
        let r = Reconciler::new(MemoryDecisionStore::new(), registry);

        assert!(r.list_permissions(PKG).unwrap().is_empty());
    }

    #[test]
    fn test_whole_volume_denial_survives_directory_grant() {
        let r = reconciler(vec![never_ask(v1(), None)], &[(PKG, "V1%3AMusic")]);

        let rows = r.list_permissions(PKG).unwrap();

        assert_eq!(
            rows,
            vec![
                PermissionRow::granted(PKG, v1(), Some("Music")),
                PermissionRow::denied(PKG, v1(), None),
            ]
        );
    }

    #[test]
    fn test_other_packages_are_ignored() {
        let r = reconciler(
            vec![Decision::new(
                "com.other",
                Volume::Primary,
                Some("Music"),
                PermissionStatus::NeverAsk,
            )],
            &[("com.other", "V1")],
        );

        assert!(r.list_permissions(PKG).unwrap().is_empty());
    }

    #[test]
    fn test_list_permissions_is_idempotent() {
        let r = reconciler(
            vec![never_ask(v1(), Some("Movies")), never_ask(Volume::Primary, None)],
            &[(PKG, "V1%3APictures"), (PKG, "V2")],
        );

        assert_eq!(r.list_permissions(PKG).unwrap(), r.list_permissions(PKG).unwrap());
    }

    #[test]
    fn test_list_packages_unions_sources() {
        let registry = MemoryGrantRegistry::with_entries(vec![
            RawGrantEntry::new("com.b", "com.other.provider", "/whatever"),
            RawGrantEntry::new("com.a", "com.android.externalstorage.documents", "/tree/V1"),
        ]);
        let store = MemoryDecisionStore::with_decisions(vec![
            Decision::new("com.a", v1(), None, PermissionStatus::NeverAsk),
            Decision::new("com.c", v1(), None, PermissionStatus::Ask),
        ]);
        let r = Reconciler::new(store, registry);

        let packages: Vec<String> = r.list_packages().unwrap().unwrap().into_iter().collect();

        assert_eq!(packages, vec!["com.a", "com.b", "com.c"]);
    }

    #[test]
    fn test_list_packages_empty_is_none() {
        let r = reconciler(vec![], &[]);
        assert_eq!(r.list_packages().unwrap(), None);
    }

    #[test]
    fn test_apply_grant_caches_ask() {
        let r = reconciler(vec![], &[]);

        let outcome = r
            .apply_grant(PKG, &Volume::Primary, Some("Pictures"), true)
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(outcome.rows_affected(), 1);
        assert_eq!(
            r.store().status(PKG, &Volume::Primary, Some("Pictures")).unwrap(),
            Some(PermissionStatus::Ask)
        );
        assert!(r.list_permissions(PKG).unwrap().is_empty());
    }

    #[test]
    fn test_apply_grant_overwrites_denial() {
        let r = reconciler(vec![never_ask(v1(), Some("Music"))], &[]);

        r.apply_grant(PKG, &v1(), Some("Music"), true).unwrap();

        assert!(r.list_permissions(PKG).unwrap().is_empty());
    }

    #[test]
    fn test_revoke_is_unsupported() {
        let r = reconciler(vec![never_ask(v1(), Some("Music"))], &[]);

        let outcome = r.apply_grant(PKG, &v1(), Some("Music"), false).unwrap();

        assert_eq!(outcome, UpdateOutcome::RevokeUnsupported);
        assert_eq!(outcome.rows_affected(), 0);
        assert_eq!(
            r.store().status(PKG, &v1(), Some("Music")).unwrap(),
            Some(PermissionStatus::NeverAsk)
        );
    }

    struct DownRegistry;

    impl GrantRegistry for DownRegistry {
        fn active_grants_for(
            &self,
            _package: Option<&str>,
        ) -> crate::registry::Result<Vec<RawGrantEntry>> {
            Err(RegistryError::Unavailable("registry offline".into()))
        }
    }

    #[test]
    fn test_registry_failure_propagates() {
        let r = Reconciler::new(MemoryDecisionStore::new(), DownRegistry);

        assert!(matches!(
            r.list_permissions(PKG),
            Err(ReconcileError::Registry(RegistryError::Unavailable(_)))
        ));
        assert!(matches!(
            r.list_packages(),
            Err(ReconcileError::Registry(_))
        ));
    }
}
