//! Canned reconciliation scenarios with their expected permission rows.
//!
//! Each scenario fixes the contents of both sources and, optionally, one
//! grant update; the expected rows are what `list_permissions` must return
//! afterwards for the scenario's package.

use scoped_access_core::{Decision, PermissionRow, PermissionStatus, Volume};
use scoped_access_perms::ReconcileError;
use scoped_access_store::DecisionStore;

use crate::fixtures::TestFixture;

/// Package every scenario is about.
pub const SCENARIO_PACKAGE: &str = "com.example.pkgX";

/// A grant update applied before listing.
#[derive(Debug, Clone)]
pub struct GrantUpdate {
    pub volume: Volume,
    pub directory: Option<&'static str>,
}

/// A scenario and its expected outcome.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Human-readable name.
    pub name: &'static str,
    /// Active grants as `(volume, directory)`.
    pub grants: Vec<(Volume, Option<&'static str>)>,
    /// Cached decisions.
    pub decisions: Vec<Decision>,
    /// Update to apply before listing.
    pub update: Option<GrantUpdate>,
    /// Status cached at the update's location afterwards.
    pub expected_status: Option<PermissionStatus>,
    /// Expected rows.
    pub expected: Vec<PermissionRow>,
}

fn v1() -> Volume {
    Volume::External("V1".into())
}

fn never_ask(volume: Volume, directory: &str) -> Decision {
    Decision::new(SCENARIO_PACKAGE, volume, Some(directory), PermissionStatus::NeverAsk)
}

/// Get all canned scenarios.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "cached denial without grants",
            grants: vec![],
            decisions: vec![never_ask(Volume::Primary, "Download")],
            update: None,
            expected_status: None,
            expected: vec![PermissionRow::denied(
                SCENARIO_PACKAGE,
                Volume::Primary,
                Some("Download"),
            )],
        },
        Scenario {
            name: "whole-volume grant subsumes directory denial",
            grants: vec![(v1(), None)],
            decisions: vec![never_ask(v1(), "Pictures")],
            update: None,
            expected_status: None,
            expected: vec![PermissionRow::granted(SCENARIO_PACKAGE, v1(), None)],
        },
        Scenario {
            name: "directory grant beside a sibling denial",
            grants: vec![(v1(), Some("Pictures"))],
            decisions: vec![never_ask(v1(), "Pictures"), never_ask(v1(), "Movies")],
            update: None,
            expected_status: None,
            expected: vec![
                PermissionRow::granted(SCENARIO_PACKAGE, v1(), Some("Pictures")),
                PermissionRow::denied(SCENARIO_PACKAGE, v1(), Some("Movies")),
            ],
        },
        Scenario {
            name: "undecided prompt is not reported",
            grants: vec![],
            decisions: vec![Decision::new(
                SCENARIO_PACKAGE,
                Volume::Primary,
                Some("Music"),
                PermissionStatus::Ask,
            )],
            update: None,
            expected_status: None,
            expected: vec![],
        },
        Scenario {
            name: "grant update on an empty store caches ask",
            grants: vec![],
            decisions: vec![],
            update: Some(GrantUpdate {
                volume: Volume::Primary,
                directory: Some("Pictures"),
            }),
            expected_status: Some(PermissionStatus::Ask),
            expected: vec![],
        },
    ]
}

/// The outcome of running a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRun {
    /// Rows affected by the update, if any.
    pub rows_affected: Option<usize>,
    /// Status cached at the update's location afterwards.
    pub status: Option<PermissionStatus>,
    /// Rows listed for the scenario package.
    pub rows: Vec<PermissionRow>,
}

impl Scenario {
    /// Load the scenario into a fresh fixture.
    pub fn fixture(&self) -> TestFixture {
        let fixture = TestFixture::new();
        for (volume, directory) in &self.grants {
            fixture.grant(SCENARIO_PACKAGE, volume, *directory);
        }
        fixture.decide_all(&self.decisions);
        fixture
    }

    /// Run the scenario against in-memory sources.
    pub fn run(&self) -> Result<ScenarioRun, ReconcileError> {
        let fixture = self.fixture();
        let reconciler = fixture.reconciler();

        let mut run = ScenarioRun {
            rows_affected: None,
            status: None,
            rows: Vec::new(),
        };

        if let Some(update) = &self.update {
            let outcome =
                reconciler.apply_grant(SCENARIO_PACKAGE, &update.volume, update.directory, true)?;
            run.rows_affected = Some(outcome.rows_affected());
            run.status = reconciler
                .store()
                .status(SCENARIO_PACKAGE, &update.volume, update.directory)?;
        }

        run.rows = reconciler.list_permissions(SCENARIO_PACKAGE)?;
        Ok(run)
    }

    /// Check whether a run matches the expected outcome.
    pub fn matches(&self, run: &ScenarioRun) -> bool {
        let update_ok = match self.update {
            Some(_) => run.rows_affected == Some(1) && run.status == self.expected_status,
            None => run.rows_affected.is_none(),
        };
        update_ok && run.rows == self.expected
    }
}

/// Run every scenario and report `(name, passed)` for each.
pub fn verify_all_scenarios() -> Vec<(&'static str, bool)> {
    all_scenarios()
        .iter()
        .map(|s| {
            let passed = s.run().map(|run| s.matches(&run)).unwrap_or(false);
            (s.name, passed)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_scenarios_pass() {
        for (name, passed) in verify_all_scenarios() {
            assert!(passed, "scenario failed: {}", name);
        }
    }

    #[test]
    fn test_update_scenario_never_reports_granted() {
        let scenario = all_scenarios()
            .into_iter()
            .find(|s| s.update.is_some())
            .unwrap();

        let run = scenario.run().unwrap();

        assert_eq!(run.rows_affected, Some(1));
        assert!(run.rows.iter().all(|r| !r.granted));
    }

    #[test]
    fn test_scenarios_are_deterministic() {
        for scenario in all_scenarios() {
            assert_eq!(scenario.run().unwrap(), scenario.run().unwrap(), "{}", scenario.name);
        }
    }

    #[test]
    fn test_scenario_fixture_holds_decisions() {
        let scenarios = all_scenarios();
        let fixture = scenarios[2].fixture();
        assert_eq!(fixture.store.all_decisions().unwrap().len(), 2);
    }
}
