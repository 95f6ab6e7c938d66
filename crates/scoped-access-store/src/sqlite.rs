//! SQLite implementation of the DecisionStore trait.
//!
//! This is the persistent backend for the decision cache. It uses rusqlite
//! with bundled SQLite behind a mutex; every call runs to completion on the
//! calling thread.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use scoped_access_core::{
    external_directory_name, internal_directory_name, Decision, PermissionStatus, Volume,
};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::DecisionStore;

/// Volume key stored for the primary volume.
const PRIMARY_VOLUME_KEY: &str = "";

/// SQLite-based decision store.
///
/// Thread-safe via internal Mutex.
pub struct SqliteDecisionStore {
    conn: Mutex<Connection>,
}

impl SqliteDecisionStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("mutex poisoned: {}", e)))
    }
}

fn volume_key(volume: &Volume) -> &str {
    volume.uuid().unwrap_or(PRIMARY_VOLUME_KEY)
}

fn volume_from_key(key: String) -> Volume {
    if key == PRIMARY_VOLUME_KEY {
        Volume::Primary
    } else {
        Volume::External(key)
    }
}

fn decode_status(code: i32) -> Result<PermissionStatus> {
    PermissionStatus::from_code(code).map_err(|e| StoreError::InvalidData(e.to_string()))
}

impl DecisionStore for SqliteDecisionStore {
    fn all_decisions(&self) -> Result<Vec<Decision>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT package, volume_key, directory_key, status FROM decisions
             ORDER BY package, volume_key, directory_key",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i32>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(package, volume, directory, status)| {
                Ok(Decision::new(
                    package,
                    volume_from_key(volume),
                    external_directory_name(&directory),
                    decode_status(status)?,
                ))
            })
            .collect()
    }

    fn set_status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
        status: PermissionStatus,
    ) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO decisions (package, volume_key, directory_key, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(package, volume_key, directory_key) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at",
            params![
                package,
                volume_key(volume),
                internal_directory_name(directory),
                status.code(),
                crate::now_millis(),
            ],
        )?;

        Ok(())
    }

    fn status(
        &self,
        package: &str,
        volume: &Volume,
        directory: Option<&str>,
    ) -> Result<Option<PermissionStatus>> {
        let conn = self.lock()?;

        let code: Option<i32> = conn
            .query_row(
                "SELECT status FROM decisions
                 WHERE package = ?1 AND volume_key = ?2 AND directory_key = ?3",
                params![package, volume_key(volume), internal_directory_name(directory)],
                |row| row.get(0),
            )
            .optional()?;

        code.map(decode_status).transpose()
    }

    fn clear_package(&self, package: &str) -> Result<usize> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM decisions WHERE package = ?1", params![package])?;
        Ok(removed)
    }

    fn all_packages(&self) -> Result<BTreeSet<String>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare("SELECT DISTINCT package FROM decisions")?;
        let packages = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<BTreeSet<_>>>()?;

        Ok(packages)
    }
}
