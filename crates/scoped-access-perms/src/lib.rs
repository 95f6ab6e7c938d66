//! # Scoped Access Permissions
//!
//! The reconciliation engine: merges the grants currently in effect with
//! the cached prompt decisions into one permission view.
//!
//! ## Overview
//!
//! Two sources describe who may access which storage location:
//!
//! - the [`GrantRegistry`], which reports active grants as raw locators
//! - the [`DecisionStore`](scoped_access_store::DecisionStore), which caches
//!   how the user answered earlier prompts
//!
//! The [`Reconciler`] re-reads both on every call and applies a precedence
//! ladder:
//!
//! 1. A whole-volume grant subsumes every directory on that volume
//! 2. An active grant overrides a cached denial
//! 3. Directories outside the standard set are never reported
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scoped_access_perms::{MemoryGrantRegistry, Reconciler};
//! use scoped_access_store::MemoryDecisionStore;
//!
//! let registry = MemoryGrantRegistry::new();
//! registry
//!     .grant("com.example", "content://com.android.externalstorage.documents/tree/primary%3AMusic")
//!     .unwrap();
//!
//! let reconciler = Reconciler::new(MemoryDecisionStore::new(), registry);
//! for row in reconciler.list_permissions("com.example").unwrap() {
//!     println!("{:?}", row);
//! }
//! ```

pub mod error;
pub mod partition;
pub mod reconcile;
pub mod registry;

pub use error::{ReconcileError, RegistryError, Result};
pub use partition::{partition, GrantPartition, IgnoreReason, IgnoredGrant};
pub use reconcile::{Reconciler, UpdateOutcome};
pub use registry::memory::MemoryGrantRegistry;
pub use registry::GrantRegistry;
