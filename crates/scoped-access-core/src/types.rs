//! Strong type definitions for storage locations.
//!
//! Volumes and directories are modeled explicitly instead of relying on
//! `null` conventions: the primary volume is [`Volume::Primary`] and a
//! whole-volume location is a `None` directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Internal directory key used by the decision cache for whole-volume entries.
pub const ROOT_DIRECTORY: &str = "ROOT_DIRECTORY";

/// A storage volume.
///
/// Serializes as a nullable volume id: `null` for the primary volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Volume {
    /// The device's default storage volume.
    Primary,
    /// A secondary volume, identified by its id (usually a filesystem UUID).
    External(String),
}

impl Volume {
    /// Create an external volume, rejecting an empty id.
    pub fn external(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyVolumeId);
        }
        Ok(Volume::External(id))
    }

    /// Map a nullable volume id to a volume (`None` is the primary volume).
    pub fn from_uuid(uuid: Option<&str>) -> Self {
        match uuid {
            None => Volume::Primary,
            Some(id) => Volume::External(id.to_string()),
        }
    }

    /// The volume id, or `None` for the primary volume.
    pub fn uuid(&self) -> Option<&str> {
        match self {
            Volume::Primary => None,
            Volume::External(id) => Some(id),
        }
    }

    /// Check if this is the primary volume.
    pub fn is_primary(&self) -> bool {
        matches!(self, Volume::Primary)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Volume::Primary => f.write_str("primary"),
            Volume::External(id) => f.write_str(id),
        }
    }
}

impl From<Option<String>> for Volume {
    fn from(uuid: Option<String>) -> Self {
        match uuid {
            None => Volume::Primary,
            Some(id) => Volume::External(id),
        }
    }
}

impl From<Volume> for Option<String> {
    fn from(volume: Volume) -> Self {
        match volume {
            Volume::Primary => None,
            Volume::External(id) => Some(id),
        }
    }
}

/// The fixed set of top-level directories eligible for scoped access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardDirectory {
    Music,
    Podcasts,
    Ringtones,
    Alarms,
    Notifications,
    Pictures,
    Movies,
    Download,
    #[serde(rename = "DCIM")]
    Dcim,
    Documents,
}

impl StandardDirectory {
    /// Every standard directory, in canonical order.
    pub const ALL: [StandardDirectory; 10] = [
        StandardDirectory::Music,
        StandardDirectory::Podcasts,
        StandardDirectory::Ringtones,
        StandardDirectory::Alarms,
        StandardDirectory::Notifications,
        StandardDirectory::Pictures,
        StandardDirectory::Movies,
        StandardDirectory::Download,
        StandardDirectory::Dcim,
        StandardDirectory::Documents,
    ];

    /// The on-disk directory name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StandardDirectory::Music => "Music",
            StandardDirectory::Podcasts => "Podcasts",
            StandardDirectory::Ringtones => "Ringtones",
            StandardDirectory::Alarms => "Alarms",
            StandardDirectory::Notifications => "Notifications",
            StandardDirectory::Pictures => "Pictures",
            StandardDirectory::Movies => "Movies",
            StandardDirectory::Download => "Download",
            StandardDirectory::Dcim => "DCIM",
            StandardDirectory::Documents => "Documents",
        }
    }

    /// Check whether a directory name is one of the standard directories.
    ///
    /// Matching is exact (case-sensitive), like the filesystem names.
    pub fn is_standard(name: &str) -> bool {
        Self::ALL.iter().any(|d| d.as_str() == name)
    }
}

impl fmt::Display for StandardDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardDirectory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| CoreError::UnknownDirectory(s.to_string()))
    }
}

/// Map an externally visible directory name to the cache's internal key.
pub fn internal_directory_name(external: Option<&str>) -> &str {
    external.unwrap_or(ROOT_DIRECTORY)
}

/// Map the cache's internal directory key to its externally visible name.
pub fn external_directory_name(internal: &str) -> Option<&str> {
    if internal == ROOT_DIRECTORY {
        None
    } else {
        Some(internal)
    }
}
