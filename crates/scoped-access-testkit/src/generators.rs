//! Proptest generators for property-based testing.
//!
//! Values are drawn from small pools so that generated grants and
//! decisions collide on the same locations often enough to exercise the
//! precedence rules.

use proptest::prelude::*;

use scoped_access_core::{Decision, PermissionStatus, StandardDirectory, Volume};

use crate::fixtures::TestFixture;

/// Package names used by the generators.
pub const PACKAGES: [&str; 3] = ["com.example.alpha", "com.example.beta", "com.example.gamma"];

/// External volume ids used by the generators.
pub const VOLUME_IDS: [&str; 2] = ["1234-ABCD", "V1"];

/// Generate a package name.
pub fn package() -> impl Strategy<Value = String> {
    prop::sample::select(PACKAGES.to_vec()).prop_map(String::from)
}

/// Generate an external volume.
pub fn external_volume() -> impl Strategy<Value = Volume> {
    prop::sample::select(VOLUME_IDS.to_vec()).prop_map(|id| Volume::External(id.to_string()))
}

/// Generate any volume, primary included.
pub fn volume() -> impl Strategy<Value = Volume> {
    prop_oneof![Just(Volume::Primary), external_volume()]
}

/// Generate a standard directory name.
pub fn standard_directory() -> impl Strategy<Value = String> {
    prop::sample::select(StandardDirectory::ALL.to_vec()).prop_map(|d| d.as_str().to_string())
}

/// Generate a directory name outside the standard set.
pub fn non_standard_directory() -> impl Strategy<Value = String> {
    "x[a-z]{2,7}".prop_map(String::from)
}

/// Generate a grant directory: mostly standard, sometimes non-standard or whole volume.
pub fn grant_directory() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => standard_directory().prop_map(Some),
        1 => non_standard_directory().prop_map(Some),
        1 => Just(None),
    ]
}

/// Generate a decision directory: a standard directory or the whole volume.
pub fn decision_directory() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => standard_directory().prop_map(Some),
        1 => Just(None),
    ]
}

/// Generate a permission status.
pub fn status() -> impl Strategy<Value = PermissionStatus> {
    prop_oneof![
        Just(PermissionStatus::Ask),
        Just(PermissionStatus::AskAgain),
        Just(PermissionStatus::Granted),
        Just(PermissionStatus::NeverAsk),
    ]
}

/// Generate a cached decision.
pub fn decision() -> impl Strategy<Value = Decision> {
    (package(), volume(), decision_directory(), status()).prop_map(
        |(package, volume, directory, status)| {
            Decision::new(package, volume, directory.as_deref(), status)
        },
    )
}

/// A grant to record in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantSpec {
    pub package: String,
    pub volume: Volume,
    pub directory: Option<String>,
}

impl Arbitrary for GrantSpec {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (package(), volume(), grant_directory())
            .prop_filter("the whole primary volume is never granted", |(_, volume, dir)| {
                !(volume.is_primary() && dir.is_none())
            })
            .prop_map(|(package, volume, directory)| GrantSpec {
                package,
                volume,
                directory,
            })
            .boxed()
    }
}

/// Contents of both sources.
#[derive(Debug, Clone)]
pub struct World {
    pub grants: Vec<GrantSpec>,
    pub decisions: Vec<Decision>,
}

impl Arbitrary for World {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            prop::collection::vec(any::<GrantSpec>(), 0..8),
            prop::collection::vec(decision(), 0..12),
        )
            .prop_map(|(grants, decisions)| World { grants, decisions })
            .boxed()
    }
}

impl World {
    /// Load this world into a fresh fixture. Later decisions on the same
    /// location overwrite earlier ones.
    pub fn fixture(&self) -> TestFixture {
        let fixture = TestFixture::new();
        for g in &self.grants {
            fixture.grant(&g.package, &g.volume, g.directory.as_deref());
        }
        fixture.decide_all(&self.decisions);
        fixture
    }

    /// Check if `package` holds a whole-volume grant on `volume`.
    pub fn has_volume_grant(&self, package: &str, volume: &Volume) -> bool {
        self.grants
            .iter()
            .any(|g| g.package == package && &g.volume == volume && g.directory.is_none())
    }

    /// Check if `package` holds a grant on exactly `directory` of `volume`.
    pub fn has_directory_grant(&self, package: &str, volume: &Volume, directory: &str) -> bool {
        self.grants.iter().any(|g| {
            g.package == package && &g.volume == volume && g.directory.as_deref() == Some(directory)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn test_whole_volume_grant_hides_directories(world in any::<World>(), package in package()) {
            let rows = world.fixture().reconciler().list_permissions(&package).unwrap();

            for row in &rows {
                if row.directory.is_some() {
                    prop_assert!(!world.has_volume_grant(&package, &row.volume), "{:?}", row);
                }
            }
        }

        #[test]
        fn test_granted_locations_are_never_denied(world in any::<World>(), package in package()) {
            let rows = world.fixture().reconciler().list_permissions(&package).unwrap();

            for row in rows.iter().filter(|r| !r.granted) {
                prop_assert!(!world.has_volume_grant(&package, &row.volume));
                if let Some(dir) = &row.directory {
                    prop_assert!(!world.has_directory_grant(&package, &row.volume, dir));
                }
            }
        }

        #[test]
        fn test_only_standard_directories_are_granted(world in any::<World>(), package in package()) {
            let rows = world.fixture().reconciler().list_permissions(&package).unwrap();

            for row in rows.iter().filter(|r| r.granted) {
                if let Some(dir) = &row.directory {
                    prop_assert!(StandardDirectory::is_standard(dir), "{:?}", row);
                }
            }
        }

        #[test]
        fn test_rows_are_unique_and_owned(world in any::<World>(), package in package()) {
            let rows = world.fixture().reconciler().list_permissions(&package).unwrap();

            let mut seen = BTreeSet::new();
            for row in &rows {
                prop_assert_eq!(&row.package, &package);
                prop_assert!(seen.insert((row.volume.clone(), row.directory.clone())), "{:?}", row);
            }
        }

        #[test]
        fn test_list_permissions_is_idempotent(world in any::<World>(), package in package()) {
            let reconciler = world.fixture().reconciler();

            let first = reconciler.list_permissions(&package).unwrap();
            let second = reconciler.list_permissions(&package).unwrap();

            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_list_packages_is_union(world in any::<World>()) {
            let expected: BTreeSet<String> = world
                .grants
                .iter()
                .map(|g| g.package.clone())
                .chain(world.decisions.iter().map(|d| d.package.clone()))
                .collect();

            let listed = world.fixture().reconciler().list_packages().unwrap();

            if expected.is_empty() {
                prop_assert_eq!(listed, None);
            } else {
                prop_assert_eq!(listed, Some(expected));
            }
        }

        #[test]
        fn test_apply_grant_never_reports_granted(
            world in any::<World>(),
            package in package(),
            volume in volume(),
            directory in decision_directory(),
        ) {
            let fixture = world.fixture();
            let reconciler = fixture.reconciler();
            let before = reconciler.list_permissions(&package).unwrap();

            reconciler
                .apply_grant(&package, &volume, directory.as_deref(), true)
                .unwrap();
            let after = reconciler.list_permissions(&package).unwrap();

            // The location is no longer denied, and no new granted row appears.
            prop_assert!(!after
                .iter()
                .any(|r| !r.granted && r.volume == volume && r.directory == directory));
            let granted_before: Vec<_> = before.iter().filter(|r| r.granted).collect();
            let granted_after: Vec<_> = after.iter().filter(|r| r.granted).collect();
            prop_assert_eq!(granted_before, granted_after);
        }
    }
}
