//! Cached decisions: prior user responses to permission prompts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::Volume;

/// The cached response to a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionStatus {
    /// No decision yet; the user will be prompted.
    Ask,
    /// The user denied once and may be prompted again.
    AskAgain,
    /// The user granted the request.
    Granted,
    /// The user denied and asked not to be prompted again.
    NeverAsk,
}

impl PermissionStatus {
    /// Stable integer code, used by persistent stores.
    pub const fn code(self) -> i32 {
        match self {
            PermissionStatus::Ask => 0,
            PermissionStatus::AskAgain => 1,
            PermissionStatus::Granted => 2,
            PermissionStatus::NeverAsk => -1,
        }
    }

    /// Parse a stable integer code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(PermissionStatus::Ask),
            1 => Ok(PermissionStatus::AskAgain),
            2 => Ok(PermissionStatus::Granted),
            -1 => Ok(PermissionStatus::NeverAsk),
            other => Err(CoreError::UnknownStatusCode(other)),
        }
    }

    /// Stable string name.
    pub const fn as_str(self) -> &'static str {
        match self {
            PermissionStatus::Ask => "ASK",
            PermissionStatus::AskAgain => "ASK_AGAIN",
            PermissionStatus::Granted => "GRANTED",
            PermissionStatus::NeverAsk => "NEVER_ASK",
        }
    }

    /// Check if this status records the user turning a request down.
    pub const fn is_denial(self) -> bool {
        matches!(self, PermissionStatus::AskAgain | PermissionStatus::NeverAsk)
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ASK" => Ok(PermissionStatus::Ask),
            "ASK_AGAIN" => Ok(PermissionStatus::AskAgain),
            "GRANTED" => Ok(PermissionStatus::Granted),
            "NEVER_ASK" => Ok(PermissionStatus::NeverAsk),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// A cached decision for one `(package, volume, directory)` location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    /// The package the decision was made for.
    pub package: String,
    /// The volume the package asked for.
    pub volume: Volume,
    /// The directory the package asked for, `None` for the whole volume.
    pub directory: Option<String>,
    /// The recorded response.
    pub status: PermissionStatus,
}

impl Decision {
    /// Create a new decision.
    pub fn new(
        package: impl Into<String>,
        volume: Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> Self {
        Self {
            package: package.into(),
            volume,
            directory: directory.map(String::from),
            status,
        }
    }

    /// Check if this decision covers the whole volume.
    pub fn is_whole_volume(&self) -> bool {
        self.directory.is_none()
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Permission: [pkg={}, uuid={}, dir={}, status={}]",
            self.package,
            self.volume.uuid().unwrap_or("null"),
            self.directory.as_deref().unwrap_or("null"),
            self.status
        )
    }
}
