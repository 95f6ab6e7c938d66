//! Partitioning of parsed grants into whole-volume and directory grants.

use std::collections::{BTreeMap, BTreeSet};

use scoped_access_core::{Grant, StandardDirectory, Volume};

/// Why a parsed grant took no part in reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The directory is not one of the standard directories.
    NonStandardDirectory,
}

/// A grant left out of the partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredGrant {
    pub grant: Grant,
    pub reason: IgnoreReason,
}

/// Active grants of one package, grouped by coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantPartition {
    /// Volumes with a whole-volume grant.
    pub granted_volumes: BTreeSet<Volume>,
    /// Standard directories granted individually, per volume.
    pub granted_dirs: BTreeMap<Volume, BTreeSet<String>>,
    /// Grants naming a non-standard directory.
    pub ignored: Vec<IgnoredGrant>,
}

impl GrantPartition {
    /// Check if `volume` has a whole-volume grant.
    pub fn is_volume_granted(&self, volume: &Volume) -> bool {
        self.granted_volumes.contains(volume)
    }

    /// Check if `directory` on `volume` was granted individually.
    pub fn is_directory_granted(&self, volume: &Volume, directory: &str) -> bool {
        self.granted_dirs
            .get(volume)
            .is_some_and(|dirs| dirs.contains(directory))
    }

    /// Check if any grant covers the location.
    pub fn covers(&self, volume: &Volume, directory: Option<&str>) -> bool {
        if self.is_volume_granted(volume) {
            return true;
        }
        directory.is_some_and(|dir| self.is_directory_granted(volume, dir))
    }
}

/// Split grants into whole-volume grants and standard directory grants.
pub fn partition<'a, I>(grants: I) -> GrantPartition
where
    I: IntoIterator<Item = &'a Grant>,
{
    let mut partition = GrantPartition::default();

    for grant in grants {
        match grant.directory_name() {
            None => {
                partition.granted_volumes.insert(grant.volume().clone());
            }
            Some(dir) if StandardDirectory::is_standard(dir) => {
                partition
                    .granted_dirs
                    .entry(grant.volume().clone())
                    .or_default()
                    .insert(dir.to_string());
            }
            Some(_) => partition.ignored.push(IgnoredGrant {
                grant: grant.clone(),
                reason: IgnoreReason::NonStandardDirectory,
            }),
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v1() -> Volume {
        Volume::External("V1".into())
    }

    #[test]
    fn test_partition_groups_grants() {
        let grants = vec![
            Grant::whole_volume("p", "V1").unwrap(),
            Grant::directory("p", Volume::Primary, "Music").unwrap(),
            Grant::directory("p", Volume::Primary, "DCIM").unwrap(),
            Grant::directory("p", v1(), "Pictures").unwrap(),
        ];

        let partition = partition(&grants);

        assert!(partition.is_volume_granted(&v1()));
        assert!(!partition.is_volume_granted(&Volume::Primary));
        assert_eq!(partition.granted_dirs[&Volume::Primary].len(), 2);
        assert!(partition.is_directory_granted(&v1(), "Pictures"));
        assert!(partition.ignored.is_empty());
    }

    #[test]
    fn test_non_standard_directory_is_ignored() {
        let grants = vec![Grant::directory("p", Volume::Primary, "Secrets").unwrap()];

        let partition = partition(&grants);

        assert!(partition.granted_dirs.is_empty());
        assert_eq!(partition.ignored.len(), 1);
        assert_eq!(partition.ignored[0].reason, IgnoreReason::NonStandardDirectory);
    }

    #[test]
    fn test_covers() {
        let grants = vec![
            Grant::whole_volume("p", "V1").unwrap(),
            Grant::directory("p", Volume::Primary, "Music").unwrap(),
        ];
        let partition = partition(&grants);

        assert!(partition.covers(&v1(), None));
        assert!(partition.covers(&v1(), Some("Anything")));
        assert!(partition.covers(&Volume::Primary, Some("Music")));
        assert!(!partition.covers(&Volume::Primary, Some("Movies")));
        assert!(!partition.covers(&Volume::Primary, None));
    }

    #[test]
    fn test_duplicate_grants_collapse() {
        let grants = vec![
            Grant::directory("p", Volume::Primary, "Music").unwrap(),
            Grant::directory("p", Volume::Primary, "Music").unwrap(),
        ];
        let partition = partition(&grants);
        assert_eq!(partition.granted_dirs[&Volume::Primary].len(), 1);
    }
}
