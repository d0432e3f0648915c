// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes: the
//! single writer is what makes per-key write serialization (documents,
//! message enrichment fields) hold without explicit locking.

use engram_core::EngramError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Convert tokio_rusqlite errors into EngramError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error) -> EngramError {
    EngramError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the single SQLite connection.
///
/// Opening runs the embedded migrations and applies the PRAGMA set; every
/// query module borrows this handle and calls through `connection().call()`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, EngramError> {
        Self::open_with_journal(path, true).await
    }

    /// Open with an explicit journal mode choice. `wal` false falls back to
    /// the rollback journal (useful on filesystems without mmap support).
    pub async fn open_with_journal(path: &str, wal: bool) -> Result<Self, EngramError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| EngramError::Storage { source: Box::new(e) })?;
            }
        }

        let conn = Connection::open(path.to_string())
            .await
            .map_err(|e| EngramError::Storage { source: Box::new(e) })?;

        let journal_mode = if wal { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal_mode};
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;"
        );
        conn.call(move |conn| -> Result<(), EngramError> {
            conn.execute_batch(&pragmas)
                .map_err(|e| EngramError::Storage { source: Box::new(e) })?;
            crate::migrations::run_migrations(conn)
        })
        .await
        .map_err(|e| match e {
            tokio_rusqlite::Error::Error(err) => err,
            other => EngramError::Storage { source: Box::new(other) },
        })?;

        debug!(path, journal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes before shutdown.
    pub async fn close(&self) -> Result<(), EngramError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
