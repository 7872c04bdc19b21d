//! SQLite persistence for players, progress, catalog and ledger.
//!
//! A single bundled-SQLite connection guarded by an async mutex; queries run
//! on the blocking pool. Every service-level mutation goes through
//! [`Store::write_tx`], which wraps its closure in one IMMEDIATE transaction:
//! concurrent writers serialize at the store and partial updates never
//! commit. The `UNIQUE(player_id, reward_id)` constraint on the ledger backs
//! the at-most-one-grant rule even when two transactions race.

pub mod catalog;
pub mod ledger;
pub mod players;
pub mod progress;

use std::path::Path;
use std::sync::Arc;

use rusqlite::{Connection, TransactionBehavior};
use tokio::sync::Mutex;
use tracing::{debug, info};

use battlepass_common::error::{BattlePassError, Result};

/// Maps an unexpected SQLite error to the opaque storage class.
pub(crate) fn storage_err(err: rusqlite::Error) -> BattlePassError {
    BattlePassError::Storage(err.to_string())
}

/// True when the error is a unique-key (or primary-key) violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Handle to the battle pass database.
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file and prepares the schema.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        info!("Opening battle pass database at {}", path.display());

        let conn = tokio::task::spawn_blocking(move || -> anyhow::Result<Connection> {
            let conn = Connection::open(&path).context("Failed to open SQLite database")?;

            // WAL keeps readers unblocked while a writer commits
            conn.pragma_update(None, "journal_mode", "WAL")
                .context("Failed to enable WAL mode")?;
            conn.pragma_update(None, "synchronous", "NORMAL")
                .context("Failed to set synchronous mode")?;
            conn.pragma_update(None, "foreign_keys", "ON")
                .context("Failed to enable foreign keys")?;

            initialize_schema(&conn)?;
            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests as the storage substitute.
    pub async fn open_in_memory() -> anyhow::Result<Self> {
        let conn = tokio::task::spawn_blocking(|| -> anyhow::Result<Connection> {
            let conn = Connection::open_in_memory()?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            initialize_schema(&conn)?;
            Ok(conn)
        })
        .await??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs a read-only query on the blocking pool.
    pub async fn read<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            f(&conn)
        })
        .await
        .map_err(|e| BattlePassError::Storage(format!("storage task failed: {e}")))?
    }

    /// Runs `f` inside a single IMMEDIATE transaction.
    ///
    /// The transaction commits only when `f` returns `Ok`; any error rolls
    /// every write back, so no multi-row mutation is ever partially visible.
    pub async fn write_tx<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&Connection) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(storage_err)?;
            match f(&tx) {
                Ok(value) => {
                    tx.commit().map_err(storage_err)?;
                    Ok(value)
                }
                Err(err) => {
                    if let Err(rollback) = tx.rollback() {
                        debug!("rollback after failed transaction: {rollback}");
                    }
                    Err(err)
                }
            }
        })
        .await
        .map_err(|e| BattlePassError::Storage(format!("storage task failed: {e}")))?
    }
}

fn initialize_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS players (
            player_id TEXT PRIMARY KEY,
            nickname TEXT NOT NULL UNIQUE,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS battle_passes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL UNIQUE
                REFERENCES players(player_id) ON DELETE CASCADE,
            level INTEGER NOT NULL DEFAULT 1,
            experience INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS battle_pass_rewards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            level INTEGER NOT NULL UNIQUE,
            reward TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS player_rewards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL
                REFERENCES players(player_id) ON DELETE CASCADE,
            reward_id INTEGER NOT NULL
                REFERENCES battle_pass_rewards(id),
            claimed INTEGER NOT NULL DEFAULT 0,
            granted_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(player_id, reward_id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_player_rewards_player
         ON player_rewards(player_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_player_rewards_claimed
         ON player_rewards(player_id, claimed)",
        [],
    )?;

    debug!("Database schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_schema_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("battlepass.db");
        let store = Store::open(&path).await.unwrap();
        assert!(path.exists());

        let tables = store
            .read(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table'
                     AND name IN ('players','battle_passes','battle_pass_rewards','player_rewards')",
                    [],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(storage_err)
            })
            .await
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back() {
        let store = Store::open_in_memory().await.unwrap();

        let result: Result<()> = store
            .write_tx(|tx| {
                tx.execute(
                    "INSERT INTO battle_pass_rewards (level, reward) VALUES (1, '{}')",
                    [],
                )
                .map_err(storage_err)?;
                Err(BattlePassError::InvalidArgument("abort".into()))
            })
            .await;
        assert!(result.is_err());

        let count = store
            .read(|conn| {
                conn.query_row("SELECT COUNT(*) FROM battle_pass_rewards", [], |row| {
                    row.get::<_, i64>(0)
                })
                .map_err(storage_err)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
