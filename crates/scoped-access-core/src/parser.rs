//! Grant record parsing: decoding raw registry entries into [`Grant`]s.
//!
//! Parsing is best-effort over a heterogeneous feed. Entries that fail
//! structural checks are returned as [`Rejected`] diagnostics alongside the
//! accepted grants; a batch parse never fails.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, RejectReason};
use crate::grant::{Grant, RawGrantEntry};
use crate::types::Volume;

/// Separator between the volume and directory tokens of a tree id.
pub const VOLUME_SEPARATOR: char = ':';

/// Where grant locators come from and how their trees are spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorScheme {
    /// Authority of the storage provider whose grants are scoped access grants.
    pub storage_authority: String,
    /// First path segment of a tree locator.
    pub tree_marker: String,
    /// Volume token naming the primary volume.
    pub primary_root: String,
}

impl Default for LocatorScheme {
    fn default() -> Self {
        Self {
            storage_authority: "com.android.externalstorage.documents".into(),
            tree_marker: "tree".into(),
            primary_root: "primary".into(),
        }
    }
}

/// A raw entry the parser dropped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub entry: RawGrantEntry,
    pub reason: RejectReason,
}

/// The result of parsing a batch of raw entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// One grant per accepted entry, in input order.
    pub grants: Vec<Grant>,
    /// Every dropped entry, in input order.
    pub rejected: Vec<Rejected>,
}

/// Decodes raw registry entries into grants.
#[derive(Debug, Clone, Default)]
pub struct GrantRecordParser {
    scheme: LocatorScheme,
}

impl GrantRecordParser {
    /// Create a parser for the given locator scheme.
    pub fn new(scheme: LocatorScheme) -> Self {
        Self { scheme }
    }

    /// The scheme this parser accepts.
    pub fn scheme(&self) -> &LocatorScheme {
        &self.scheme
    }

    /// Parse a batch of raw entries.
    pub fn parse<I>(&self, entries: I) -> ParseOutcome
    where
        I: IntoIterator<Item = RawGrantEntry>,
    {
        let mut outcome = ParseOutcome::default();
        for entry in entries {
            match self.parse_entry(&entry) {
                Ok(grant) => outcome.grants.push(grant),
                Err(reason) => outcome.rejected.push(Rejected { entry, reason }),
            }
        }
        outcome
    }

    /// Parse a single raw entry.
    ///
    /// Accepted locators look like `<tree_marker>/<volume>` (whole volume)
    /// or `<tree_marker>/<volume>:<directory>`, optionally followed by more
    /// segments.
    pub fn parse_entry(&self, entry: &RawGrantEntry) -> Result<Grant, RejectReason> {
        // 1. Only grants issued by the storage provider are scoped access grants
        if entry.authority != self.scheme.storage_authority {
            return Err(RejectReason::WrongAuthority);
        }

        // 2. Need at least the tree marker and the tree id
        let segments = entry.path_segments();
        if segments.len() < 2 {
            return Err(RejectReason::TooFewSegments);
        }

        // 3. First segment must be the tree marker
        if segments[0] != self.scheme.tree_marker {
            return Err(RejectReason::NotATree);
        }

        // 4. Tree id is either VOLUME or VOLUME:DIRECTORY
        let (volume_token, directory) = split_tree_id(&segments[1])?;
        if volume_token.is_empty() {
            return Err(RejectReason::EmptyVolume);
        }

        let volume = if volume_token == self.scheme.primary_root {
            Volume::Primary
        } else {
            Volume::External(volume_token.to_string())
        };

        // 5. The grant itself enforces its invariants
        Grant::new(entry.package.clone(), volume, directory.map(String::from)).map_err(
            |e| match e {
                CoreError::EmptyPackage => RejectReason::MissingPackage,
                _ => RejectReason::WholePrimaryVolume,
            },
        )
    }
}

/// Split a tree id into its volume token and optional directory.
///
/// Trailing empty pieces are ignored, so `V1:` is the whole volume `V1`.
fn split_tree_id(tree_id: &str) -> Result<(&str, Option<&str>), RejectReason> {
    let mut parts: Vec<&str> = tree_id.split(VOLUME_SEPARATOR).collect();
    while parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    match parts.as_slice() {
        [volume] => Ok((*volume, None)),
        [volume, directory] => Ok((*volume, Some(*directory))),
        _ => Err(RejectReason::BadVolumeSplit),
    }
}
