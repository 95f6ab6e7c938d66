//! The provider: table-shaped access to the reconciled permission view.
//!
//! Callers address tables by URI and pass positional selection arguments,
//! the way a content provider is queried. Reads go through the reconciler;
//! the only write is marking a permission granted.

use std::fmt;

use serde::{Deserialize, Serialize};

use scoped_access_core::{LocatorScheme, PackageRow, PermissionRow, Volume};
use scoped_access_perms::{GrantRegistry, ReconcileError, Reconciler, UpdateOutcome};
use scoped_access_store::DecisionStore;

use crate::error::{ProviderError, Result};
use crate::router::{Table, TableRouter};

/// Default authority of the provider.
pub const DEFAULT_AUTHORITY: &str = "com.android.documentsui.scopedAccess";

/// Number of selection arguments an update takes: package, volume, directory.
pub const UPDATE_ARG_COUNT: usize = 3;

/// Configuration for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Authority the provider's URIs are issued under.
    pub authority: String,
    /// How active grant locators are decoded.
    pub scheme: LocatorScheme,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            authority: DEFAULT_AUTHORITY.to_string(),
            scheme: LocatorScheme::default(),
        }
    }
}

/// Values of a permissions update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateValues {
    /// New value of the `granted` column.
    pub granted: Option<bool>,
}

impl UpdateValues {
    /// Values setting `granted`.
    pub fn granted(granted: bool) -> Self {
        Self {
            granted: Some(granted),
        }
    }
}

/// Rows returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Packages(Vec<PackageRow>),
    Permissions(Vec<PermissionRow>),
}

impl QueryResult {
    /// The table the rows belong to.
    pub fn table(&self) -> Table {
        match self {
            QueryResult::Packages(_) => Table::Packages,
            QueryResult::Permissions(_) => Table::Permissions,
        }
    }

    /// Column names of the rows.
    pub fn columns(&self) -> &'static [&'static str] {
        self.table().columns()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Packages(rows) => rows.len(),
            QueryResult::Permissions(rows) => rows.len(),
        }
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exposes the packages and permissions tables over a reconciler.
///
/// Provides:
/// - Querying both tables
/// - Marking a permission granted
/// - A plain-text diagnostic dump
pub struct ScopedAccessProvider<S, R> {
    reconciler: Reconciler<S, R>,
    router: TableRouter,
    config: ProviderConfig,
}

impl<S: DecisionStore, R: GrantRegistry> ScopedAccessProvider<S, R> {
    /// Create a new provider instance.
    pub fn new(store: S, registry: R, config: ProviderConfig) -> Self {
        Self {
            reconciler: Reconciler::with_scheme(store, registry, config.scheme.clone()),
            router: TableRouter::new(config.authority.clone()),
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Get the router.
    pub fn router(&self) -> &TableRouter {
        &self.router
    }

    /// Get the reconciler.
    pub fn reconciler(&self) -> &Reconciler<S, R> {
        &self.reconciler
    }

    /// The URI of a table under this provider's authority.
    pub fn table_uri(&self, table: Table) -> String {
        self.router.uri_for(table)
    }

    fn route(&self, operation: &str, uri: &str) -> Result<Table> {
        self.router.route(uri).ok_or_else(|| {
            ProviderError::UnsupportedOperation(format!("{}(): unsupported uri {}", operation, uri))
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Query a table.
    ///
    /// `packages` takes no arguments and yields `None` when no package is
    /// known. `permissions` takes the package as its first argument; extra
    /// arguments are ignored.
    pub fn query(&self, uri: &str, selection_args: &[&str]) -> Result<Option<QueryResult>> {
        match self.route("query", uri)? {
            Table::Packages => {
                let packages = self.reconciler.list_packages()?;
                Ok(packages.map(|set| {
                    QueryResult::Packages(set.into_iter().map(PackageRow::new).collect())
                }))
            }
            Table::Permissions => {
                let package = match selection_args {
                    [] => {
                        return Err(ProviderError::InvalidRequest(
                            "permissions query requires a package argument".into(),
                        ))
                    }
                    [package] => *package,
                    [package, extra @ ..] => {
                        tracing::warn!(package, ignored = ?extra, "using only the first selection argument");
                        *package
                    }
                };
                let rows = self.reconciler.list_permissions(package)?;
                Ok(Some(QueryResult::Permissions(rows)))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Update the permissions table.
    ///
    /// Arguments are `package`, nullable volume id and nullable directory.
    /// Setting `granted` to false is accepted but changes nothing and
    /// reports zero rows. Returns the number of rows affected.
    pub fn update(
        &self,
        uri: &str,
        values: &UpdateValues,
        selection_args: &[Option<&str>],
    ) -> Result<usize> {
        if self.route("update", uri)? != Table::Permissions {
            return Err(ProviderError::UnsupportedOperation(format!(
                "update(): unsupported uri {}",
                uri
            )));
        }

        let granted = values.granted.ok_or_else(|| {
            ProviderError::InvalidRequest("update requires a granted value".into())
        })?;

        if !granted {
            tracing::warn!(args = ?selection_args, "disabling a permission is not supported");
            return Ok(UpdateOutcome::RevokeUnsupported.rows_affected());
        }

        let [package, volume, directory] = selection_args else {
            return Err(ProviderError::InvalidRequest(format!(
                "update requires exactly {} arguments (package, nullable volume, nullable directory), got {}",
                UPDATE_ARG_COUNT,
                selection_args.len()
            )));
        };

        let package = match package {
            Some(package) if !package.is_empty() => *package,
            _ => {
                return Err(ProviderError::InvalidRequest(
                    "update requires a package".into(),
                ))
            }
        };
        let volume = match volume {
            None => Volume::Primary,
            Some(id) => Volume::external(*id)
                .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?,
        };

        let outcome = self
            .reconciler
            .apply_grant(package, &volume, *directory, granted)?;
        Ok(outcome.rows_affected())
    }

    /// Inserting is not supported.
    pub fn insert(&self, uri: &str, _values: &UpdateValues) -> Result<()> {
        Err(ProviderError::UnsupportedOperation(format!(
            "insert(): unsupported uri {}",
            uri
        )))
    }

    /// Deleting is not supported.
    pub fn delete(&self, uri: &str, _selection_args: &[Option<&str>]) -> Result<usize> {
        Err(ProviderError::UnsupportedOperation(format!(
            "delete(): unsupported uri {}",
            uri
        )))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Diagnostics
    // ─────────────────────────────────────────────────────────────────────────

    /// Write a plain-text dump of both tables and the raw cached decisions.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> Result<()> {
        const PREFIX: &str = "  ";

        let packages = self.reconciler.list_packages()?.unwrap_or_default();
        if packages.is_empty() {
            writeln!(out, "Packages: N/A")?;
        } else {
            writeln!(out, "Packages: {}", packages.len())?;
            for package in &packages {
                writeln!(out, "{}{}", PREFIX, package)?;
            }
        }

        if packages.is_empty() {
            writeln!(out, "Permissions: N/A")?;
        }
        for package in &packages {
            let rows = self.reconciler.list_permissions(package)?;
            writeln!(out, "Permissions: {}", rows.len())?;
            for row in &rows {
                write!(out, "{}{}/", PREFIX, row.package)?;
                if let Some(uuid) = row.volume.uuid() {
                    write!(out, "{}>", uuid)?;
                }
                writeln!(
                    out,
                    "{}: {}",
                    row.directory.as_deref().unwrap_or("null"),
                    row.granted
                )?;
            }
        }

        let decisions = self
            .reconciler
            .store()
            .all_decisions()
            .map_err(ReconcileError::from)?;
        if decisions.is_empty() {
            writeln!(out, "Raw permissions: N/A")?;
        } else {
            writeln!(out, "Raw permissions: {}", decisions.len())?;
            for decision in &decisions {
                writeln!(out, "{}{}", PREFIX, decision)?;
            }
        }

        Ok(())
    }
}

impl<S, R> fmt::Debug for ScopedAccessProvider<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedAccessProvider")
            .field("router", &self.router)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_access_core::{Decision, PermissionStatus};
    use scoped_access_perms::MemoryGrantRegistry;
    use scoped_access_store::MemoryDecisionStore;

    type TestProvider = ScopedAccessProvider<MemoryDecisionStore, MemoryGrantRegistry>;

    const PACKAGES: &str = "content://com.android.documentsui.scopedAccess/packages/*";
    const PERMISSIONS: &str = "content://com.android.documentsui.scopedAccess/permissions/*";

    fn provider(decisions: Vec<Decision>) -> TestProvider {
        ScopedAccessProvider::new(
            MemoryDecisionStore::with_decisions(decisions),
            MemoryGrantRegistry::new(),
            ProviderConfig::default(),
        )
    }

    #[test]
    fn test_query_packages_empty_is_none() {
        let p = provider(vec![]);
        assert_eq!(p.query(PACKAGES, &[]).unwrap(), None);
    }

    #[test]
    fn test_query_permissions_requires_package() {
        let p = provider(vec![]);
        assert!(matches!(
            p.query(PERMISSIONS, &[]),
            Err(ProviderError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_query_permissions_uses_first_argument() {
        let p = provider(vec![
            Decision::new("a", Volume::Primary, Some("Music"), PermissionStatus::NeverAsk),
            Decision::new("b", Volume::Primary, Some("Movies"), PermissionStatus::NeverAsk),
        ]);

        let result = p.query(PERMISSIONS, &["a", "b"]).unwrap().unwrap();

        assert_eq!(
            result,
            QueryResult::Permissions(vec![PermissionRow::denied(
                "a",
                Volume::Primary,
                Some("Music")
            )])
        );
        assert_eq!(result.columns(), &["package", "volume_uuid", "directory", "granted"]);
    }

    #[test]
    fn test_query_unknown_uri_is_unsupported() {
        let p = provider(vec![]);
        assert!(matches!(
            p.query("content://com.android.documentsui.scopedAccess/other/*", &[]),
            Err(ProviderError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_update_grant_writes_ask() {
        let p = provider(vec![]);

        let count = p
            .update(PERMISSIONS, &UpdateValues::granted(true), &[Some("a"), Some("V1"), None])
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            p.reconciler()
                .store()
                .status("a", &Volume::External("V1".into()), None)
                .unwrap(),
            Some(PermissionStatus::Ask)
        );
    }

    #[test]
    fn test_update_revoke_changes_nothing() {
        let p = provider(vec![]);

        // Argument count is not checked for revokes.
        let count = p
            .update(PERMISSIONS, &UpdateValues::granted(false), &[])
            .unwrap();

        assert_eq!(count, 0);
        assert!(p.reconciler().store().is_empty().unwrap());
    }

    #[test]
    fn test_update_rejects_bad_arguments() {
        let p = provider(vec![]);
        let values = UpdateValues::granted(true);

        assert!(matches!(
            p.update(PERMISSIONS, &values, &[Some("a"), None]),
            Err(ProviderError::InvalidRequest(_))
        ));
        assert!(matches!(
            p.update(PERMISSIONS, &values, &[None, None, Some("Music")]),
            Err(ProviderError::InvalidRequest(_))
        ));
        assert!(matches!(
            p.update(PERMISSIONS, &values, &[Some("a"), Some(""), Some("Music")]),
            Err(ProviderError::InvalidRequest(_))
        ));
        assert!(matches!(
            p.update(PERMISSIONS, &UpdateValues::default(), &[Some("a"), None, None]),
            Err(ProviderError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_packages_table_is_read_only() {
        let p = provider(vec![]);
        assert!(matches!(
            p.update(PACKAGES, &UpdateValues::granted(true), &[Some("a"), None, None]),
            Err(ProviderError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_insert_and_delete_are_unsupported() {
        let p = provider(vec![]);
        assert!(matches!(
            p.insert(PERMISSIONS, &UpdateValues::granted(true)),
            Err(ProviderError::UnsupportedOperation(_))
        ));
        assert!(matches!(
            p.delete(PERMISSIONS, &[Some("a")]),
            Err(ProviderError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_dump_empty() {
        let p = provider(vec![]);
        let mut out = String::new();
        p.dump(&mut out).unwrap();

        assert_eq!(out, "Packages: N/A\nPermissions: N/A\nRaw permissions: N/A\n");
    }

    #[test]
    fn test_dump_lists_tables() {
        let p = provider(vec![
            Decision::new("a", Volume::Primary, Some("Music"), PermissionStatus::NeverAsk),
            Decision::new("a", Volume::External("V1".into()), None, PermissionStatus::AskAgain),
        ]);
        let mut out = String::new();
        p.dump(&mut out).unwrap();

        let expected = "\
Packages: 1
  a
Permissions: 2
  a/Music: false
  a/V1>null: false
Raw permissions: 2
  Permission: [pkg=a, uuid=null, dir=Music, status=NEVER_ASK]
  Permission: [pkg=a, uuid=V1, dir=null, status=ASK_AGAIN]
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"authority":"x.y"}"#).unwrap();
        assert_eq!(config.authority, "x.y");
        assert_eq!(config.scheme, LocatorScheme::default());
    }
}
