//! # Scoped Access Testkit
//!
//! Testing utilities for scoped access reconciliation.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Scenarios**: Canned source contents with the permission rows they must produce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Shared in-memory sources and failing collaborators
//!
//! ## Scenarios
//!
//! ```rust
//! use scoped_access_testkit::scenarios::verify_all_scenarios;
//!
//! for (name, passed) in verify_all_scenarios() {
//!     assert!(passed, "{}", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use scoped_access_testkit::generators::{package, World};
//!
//! proptest! {
//!     #[test]
//!     fn listing_is_idempotent(world in any::<World>(), package in package()) {
//!         let reconciler = world.fixture().reconciler();
//!         prop_assert_eq!(
//!             reconciler.list_permissions(&package).unwrap(),
//!             reconciler.list_permissions(&package).unwrap()
//!         );
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use scoped_access_testkit::fixtures::TestFixture;
//! use scoped_access_core::Volume;
//!
//! let fixture = TestFixture::new();
//! fixture
//!     .grant_volume("com.example", "1234-ABCD")
//!     .deny("com.example", &Volume::Primary, Some("DCIM"));
//! let rows = fixture.reconciler().list_permissions("com.example").unwrap();
//! assert_eq!(rows.len(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod scenarios;

pub use fixtures::{tree_entry, tree_uri, TestFixture, UnavailableRegistry, UnavailableStore};
pub use generators::{GrantSpec, World};
pub use scenarios::{all_scenarios, verify_all_scenarios, Scenario, ScenarioRun};
