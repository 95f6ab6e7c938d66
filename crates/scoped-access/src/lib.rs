//! # Scoped Access
//!
//! A single, consistent view of which applications may access which
//! storage volumes and standard directories.
//!
//! ## Overview
//!
//! Two sources describe scoped directory access:
//!
//! - **Active grants**: what the grant registry currently enforces
//! - **Cached decisions**: how the user answered earlier prompts, including
//!   explicit denials
//!
//! The [`ScopedAccessProvider`] reconciles both on every request and
//! exposes the result as two tables:
//!
//! - `packages` - every package with a grant or a decision (read-only)
//! - `permissions` - the reconciled rows of one package (writable)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use scoped_access::{ProviderConfig, ScopedAccessProvider, Table, UpdateValues};
//! use scoped_access::perms::MemoryGrantRegistry;
//! use scoped_access::store::SqliteDecisionStore;
//!
//! let store = SqliteDecisionStore::open("decisions.db").unwrap();
//! let registry = MemoryGrantRegistry::new();
//! let provider = ScopedAccessProvider::new(store, registry, ProviderConfig::default());
//!
//! let uri = provider.table_uri(Table::Permissions);
//! let rows = provider.query(&uri, &["com.example"]).unwrap();
//!
//! provider
//!     .update(&uri, &UpdateValues::granted(true), &[Some("com.example"), None, Some("Music")])
//!     .unwrap();
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `scoped_access::core` - Types, locator parsing, rows
//! - `scoped_access::store` - Decision cache and SQLite
//! - `scoped_access::perms` - Grant registry and reconciler

pub mod error;
pub mod provider;
pub mod router;

// Re-export component crates
pub use scoped_access_core as core;
pub use scoped_access_perms as perms;
pub use scoped_access_store as store;

// Re-export main types for convenience
pub use error::{ProviderError, Result};
pub use provider::{
    ProviderConfig, QueryResult, ScopedAccessProvider, UpdateValues, DEFAULT_AUTHORITY,
    UPDATE_ARG_COUNT,
};
pub use router::{Table, TableRouter, CONTENT_SCHEME};

// Re-export commonly used core types
pub use scoped_access_core::{
    Decision, LocatorScheme, PackageRow, PermissionRow, PermissionStatus, StandardDirectory,
    Volume,
};
