use thiserror::Error;

/// Failures surfaced by the database and the store handle.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite (or SQLCipher) failure, including a wrong database key.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No home or data directory to place the default database in.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Filesystem failure while preparing the database location.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lookup by key or id matched nothing.
    #[error("Record not found")]
    NotFound,

    /// A schema step failed; carries the step name and the cause.
    #[error("Migration error: {0}")]
    Migration(String),

    /// A list-valued column (course tags) held invalid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transient backend failure (network, timeout, closed handle).
    /// Surfaced as-is; the caller decides whether to retry.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
