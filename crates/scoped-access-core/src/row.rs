//! Reconciled output rows.
//!
//! Rows are pure computation results: they are rebuilt on every query and
//! never persisted.

use serde::{Deserialize, Serialize};

use crate::types::Volume;

/// Column names of the packages table.
pub const PACKAGES_COLUMNS: [&str; 1] = ["package"];

/// Column names of the permissions table.
pub const PERMISSIONS_COLUMNS: [&str; 4] = ["package", "volume_uuid", "directory", "granted"];

/// One package that has any grant or cached decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageRow {
    pub package: String,
}

impl PackageRow {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }
}

/// The reconciled, externally visible permission for one location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRow {
    /// The package the permission applies to.
    pub package: String,

    /// The volume; serialized as a nullable volume id.
    #[serde(rename = "volume_uuid")]
    pub volume: Volume,

    /// The external directory name, `None` for the whole volume.
    pub directory: Option<String>,

    /// Whether access is currently granted. Serialized as `0`/`1`.
    #[serde(with = "granted_flag")]
    pub granted: bool,
}

impl PermissionRow {
    /// A row for an active grant.
    pub fn granted(package: impl Into<String>, volume: Volume, directory: Option<&str>) -> Self {
        Self {
            package: package.into(),
            volume,
            directory: directory.map(String::from),
            granted: true,
        }
    }

    /// A row for a cached denial.
    pub fn denied(package: impl Into<String>, volume: Volume, directory: Option<&str>) -> Self {
        Self {
            package: package.into(),
            volume,
            directory: directory.map(String::from),
            granted: false,
        }
    }
}

mod granted_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(granted: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*granted))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}
