// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Query modules accept `&Database` and go through
//! [`Database::connection`]; do not open a second connection for writes.

use larder_core::LarderError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Convert a tokio-rusqlite error into `LarderError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LarderError {
    LarderError::Storage {
        source: Box::new(e),
    }
}

/// Box any storage-side error into `LarderError::Storage`.
pub(crate) fn storage_err<E>(e: E) -> LarderError
where
    E: std::error::Error + Send + Sync + 'static,
{
    LarderError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the Larder SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` in WAL mode and run migrations.
    pub async fn open(path: &str) -> Result<Self, LarderError> {
        Self::open_with_options(path, true).await
    }

    /// Open the database at `path`, choosing the journal mode, and run migrations.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, LarderError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(storage_err)?;
            }
        }

        let conn = Connection::open(path).await.map_err(storage_err)?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the full schema.
    pub async fn open_in_memory() -> Result<Self, LarderError> {
        let conn = Connection::open_in_memory().await.map_err(storage_err)?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), LarderError> {
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&format!(
                    "PRAGMA journal_mode = {journal};
                     PRAGMA synchronous = NORMAL;
                     PRAGMA foreign_keys = ON;
                     PRAGMA busy_timeout = 5000;"
                ))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    /// The shared connection; all query modules go through it.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), LarderError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(storage_err)
    }
}
