//! Watchlist Store - SQLite persistence for watchlist entries
//!
//! One table keyed by a unique `coin_id`. The connection is guarded by a
//! mutex; async callers should go through `spawn_blocking`.

mod error;
mod types;

pub use error::{StoreError, StoreResult};
pub use types::{seed_entries, NewWatchlistEntry, WatchlistEntry};

use rusqlite::{params, Connection, ErrorCode};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS watchlist (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        coin_id TEXT NOT NULL UNIQUE,
        symbol TEXT NOT NULL,
        name TEXT NOT NULL,
        target_price REAL,
        alert_enabled INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE INDEX IF NOT EXISTS idx_watchlist_name ON watchlist(name);
";

/// SQLite-backed watchlist
pub struct WatchlistStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl WatchlistStore {
    /// Open (creating if needed) the database file and its schema
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path),
        };
        store.init()?;

        Ok(store)
    }

    /// In-memory database, for tests and throwaway runs
    pub fn in_memory() -> StoreResult<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
            path: None,
        };
        store.init()?;

        Ok(store)
    }

    /// Database file location (`None` when in memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the schema if it does not exist
    pub fn init(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// All entries ordered by name
    pub fn list(&self) -> StoreResult<Vec<WatchlistEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT coin_id, name, symbol, target_price, alert_enabled
             FROM watchlist
             ORDER BY name ASC, coin_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(WatchlistEntry {
                coin_id: row.get(0)?,
                name: row.get(1)?,
                symbol: row.get(2)?,
                target_price: row.get(3)?,
                alert_enabled: row.get::<_, i64>(4)? != 0,
            })
        })?;

        let entries = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Insert an entry; a coin already present is [`StoreError::Duplicate`]
    pub fn insert(&self, entry: &NewWatchlistEntry) -> StoreResult<()> {
        let conn = self.lock()?;

        let result = conn.execute(
            "INSERT INTO watchlist (coin_id, symbol, name, target_price, alert_enabled)
             VALUES (?, ?, ?, ?, ?)",
            params![
                entry.coin_id.trim(),
                entry.symbol.trim(),
                entry.name.trim(),
                entry.target_price,
                entry.alert_enabled as i64,
            ],
        );

        match result {
            Ok(_) => {
                tracing::info!(coin_id = %entry.coin_id.trim(), "Added watchlist entry");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::Duplicate(entry.coin_id.trim().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove an entry, returning how many rows went away
    pub fn delete(&self, coin_id: &str) -> StoreResult<usize> {
        let removed = self
            .lock()?
            .execute("DELETE FROM watchlist WHERE coin_id = ?", params![coin_id])?;

        tracing::info!(coin_id, removed, "Deleted watchlist entry");
        Ok(removed)
    }

    /// Insert the default coins, skipping any already present.
    /// Returns how many were inserted.
    pub fn seed(&self) -> StoreResult<usize> {
        let mut inserted = 0;

        for entry in seed_entries() {
            match self.insert(&entry) {
                Ok(()) => inserted += 1,
                Err(StoreError::Duplicate(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(inserted)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}
