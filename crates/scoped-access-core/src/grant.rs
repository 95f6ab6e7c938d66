//! Active grants and the raw registry entries they are decoded from.

use std::fmt;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, Result};
use crate::types::Volume;

/// An active permission currently held by a package.
///
/// A grant always names something narrower than "nothing": either an
/// external volume, or a directory. A whole-volume grant on the primary
/// volume cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Grant {
    package: String,
    volume: Volume,
    directory: Option<String>,
}

impl Grant {
    /// Create a grant, enforcing its invariants.
    pub fn new(
        package: impl Into<String>,
        volume: Volume,
        directory: Option<String>,
    ) -> Result<Self> {
        let package = package.into();
        if package.is_empty() {
            return Err(CoreError::EmptyPackage);
        }
        if volume.is_primary() && directory.is_none() {
            return Err(CoreError::WholePrimaryVolume);
        }
        Ok(Self {
            package,
            volume,
            directory,
        })
    }

    /// Grant access to a whole external volume.
    pub fn whole_volume(package: impl Into<String>, volume_id: impl Into<String>) -> Result<Self> {
        Self::new(package, Volume::external(volume_id)?, None)
    }

    /// Grant access to a single directory on a volume.
    pub fn directory(
        package: impl Into<String>,
        volume: Volume,
        directory: impl Into<String>,
    ) -> Result<Self> {
        Self::new(package, volume, Some(directory.into()))
    }

    /// The package holding the grant.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The granted volume.
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// The granted directory, or `None` for the whole volume.
    pub fn directory_name(&self) -> Option<&str> {
        self.directory.as_deref()
    }

    /// Check if this grant covers the whole volume.
    pub fn is_whole_volume(&self) -> bool {
        self.directory.is_none()
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.package, self.volume)?;
        if let Some(dir) = &self.directory {
            write!(f, ":{}", dir)?;
        }
        Ok(())
    }
}

/// An undecoded entry as reported by the grant registry.
///
/// The registry is a heterogeneous feed: entries may come from any
/// authority and carry arbitrary paths. Decoding is the parser's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawGrantEntry {
    /// The package the registry says holds the grant.
    pub package: String,
    /// The authority of the granted locator.
    pub authority: String,
    /// The (possibly percent-encoded) path of the granted locator.
    pub path: String,
}

impl RawGrantEntry {
    /// Create an entry from its parts.
    pub fn new(
        package: impl Into<String>,
        authority: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            authority: authority.into(),
            path: path.into(),
        }
    }

    /// Create an entry from a full locator such as
    /// `content://com.android.externalstorage.documents/tree/primary%3ADownload`.
    pub fn from_uri(package: impl Into<String>, uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| CoreError::InvalidLocator {
            locator: uri.to_string(),
            reason: e.to_string(),
        })?;
        let authority = url.host_str().ok_or_else(|| CoreError::InvalidLocator {
            locator: uri.to_string(),
            reason: "missing authority".into(),
        })?;

        Ok(Self::new(package, authority, url.path()))
    }

    /// The decoded, non-empty path segments of the locator.
    pub fn path_segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for RawGrantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> content://{}{}", self.package, self.authority, self.path)
    }
}
