//! Watchlist store error types

use thiserror::Error;

/// Errors that can occur in the watchlist store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O operation failed (creating the database directory)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Coin is already on the watchlist
    #[error("coin already in watchlist: {0}")]
    Duplicate(String),

    /// Connection lock poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
