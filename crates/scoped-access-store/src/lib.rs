//! # Scoped Access Store
//!
//! Persistence for the decision cache: the statuses recorded when a user
//! answered a scoped-directory permission prompt.
//!
//! ## Overview
//!
//! The store module abstracts the cache behind the [`DecisionStore`] trait,
//! allowing the reconciler to be storage-agnostic. The persistent
//! implementation is [`SqliteDecisionStore`], with [`MemoryDecisionStore`]
//! for tests and embedders.
//!
//! ## Key Types
//!
//! - [`DecisionStore`] - The synchronous trait for all cache operations
//! - [`SqliteDecisionStore`] - SQLite-based persistent storage
//! - [`MemoryDecisionStore`] - In-memory storage for tests
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scoped_access_core::{PermissionStatus, Volume};
//! use scoped_access_store::{DecisionStore, SqliteDecisionStore};
//!
//! let store = SqliteDecisionStore::open("decisions.db").unwrap();
//! store
//!     .set_status("com.example", &Volume::Primary, Some("Pictures"), PermissionStatus::NeverAsk)
//!     .unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Upserts**: one status per `(package, volume, directory)`
//! - **Whole volume**: `None` directory at the interface, `ROOT_DIRECTORY` on disk
//! - **Ordering**: reads come back sorted so listings are reproducible

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryDecisionStore;
pub use sqlite::SqliteDecisionStore;
pub use traits::DecisionStore;

/// Current wall-clock time in Unix milliseconds, 0 if the clock is before the epoch.
pub(crate) fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
