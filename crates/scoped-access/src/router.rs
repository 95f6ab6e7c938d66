//! Routing of content URIs to the provider's tables.

use std::collections::HashMap;
use std::fmt;

use scoped_access_core::{PACKAGES_COLUMNS, PERMISSIONS_COLUMNS};
use url::Url;

/// URI scheme served by the provider.
pub const CONTENT_SCHEME: &str = "content";

/// The tables exposed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Read-only list of packages with any grant or decision.
    Packages,
    /// Reconciled permissions of one package; writable.
    Permissions,
}

impl Table {
    /// Table name as it appears in URIs.
    pub const fn name(self) -> &'static str {
        match self {
            Table::Packages => "packages",
            Table::Permissions => "permissions",
        }
    }

    /// Column names of the table's rows.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Packages => &PACKAGES_COLUMNS,
            Table::Permissions => &PERMISSIONS_COLUMNS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps `content://<authority>/<table>/*` URIs to tables.
///
/// Built per provider instance. The wildcard segment is optional and its
/// value is ignored.
#[derive(Debug, Clone)]
pub struct TableRouter {
    authority: String,
    routes: HashMap<&'static str, Table>,
}

impl TableRouter {
    /// Create a router serving `authority`.
    pub fn new(authority: impl Into<String>) -> Self {
        let routes = [Table::Packages, Table::Permissions]
            .into_iter()
            .map(|table| (table.name(), table))
            .collect();

        Self {
            authority: authority.into(),
            routes,
        }
    }

    /// The authority this router serves.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Resolve a URI to a table, or `None` if it is not one of ours.
    pub fn route(&self, uri: &str) -> Option<Table> {
        let url = Url::parse(uri).ok()?;
        if url.scheme() != CONTENT_SCHEME || url.host_str() != Some(self.authority.as_str()) {
            return None;
        }

        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [table] | [table, _] => self.routes.get(*table).copied(),
            _ => None,
        }
    }

    /// The canonical URI of a table.
    pub fn uri_for(&self, table: Table) -> String {
        format!("{}://{}/{}/*", CONTENT_SCHEME, self.authority, table.name())
    }
}
