// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All statements run on tokio-rusqlite's single background thread, which
//! serializes writes. Do NOT open additional connections for writes.

use std::path::Path;

use keyhold_core::KeyholdError;
use tracing::info;

use crate::migrations;

/// Handle to the catalog database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and apply migrations.
    pub async fn open(path: &str) -> Result<Self, KeyholdError> {
        Self::open_with_mode(path, true).await
    }

    /// Open the database at `path`, choosing the journal mode.
    ///
    /// Missing parent directories are created.
    pub async fn open_with_mode(path: &str, wal_mode: bool) -> Result<Self, KeyholdError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                KeyholdError::storage(format!("create directory {}", parent.display()), e)
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| KeyholdError::storage(format!("open database {path}"), e))?;
        let db = Self::initialize(conn, wal_mode).await?;
        info!(path, wal_mode, "catalog database opened");
        Ok(db)
    }

    /// Open a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, KeyholdError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| KeyholdError::storage("open in-memory database", e))?;
        Self::initialize(conn, false).await
    }

    async fn initialize(
        conn: tokio_rusqlite::Connection,
        wal_mode: bool,
    ) -> Result<Self, KeyholdError> {
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update_and_check(None, "journal_mode", journal, |row| {
                row.get::<_, String>(0)
            })?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            Ok(())
        })
        .await
        .map_err(|e| map_tr_err("configure database", e))?;

        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| KeyholdError::storage("run migrations", e.to_string()))?;

        Ok(Self { conn })
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), KeyholdError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(|e| map_tr_err("checkpoint database", e))
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

/// Convert a tokio-rusqlite error into `KeyholdError::Storage`.
pub(crate) fn map_tr_err(
    context: impl Into<String>,
    e: tokio_rusqlite::Error<rusqlite::Error>,
) -> KeyholdError {
    KeyholdError::storage(context, e)
}
