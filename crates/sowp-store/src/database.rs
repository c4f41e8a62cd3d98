//! The local SQLite database.
//!
//! Opening a [`Database`] applies the key, switches to WAL, enables foreign
//! keys (hidden-for rows and topics cascade with their parents) and brings
//! the schema up to date.
//!
//! Built with the `sqlcipher` feature, the file is encrypted with the 32-byte
//! key handed to [`Database::open_at`]. The default build links plain SQLite
//! and ignores the key.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database in the platform data directory, creating the
    /// directory on first use:
    /// - Linux:   `~/.local/share/sowp/sowp.db`
    /// - macOS:   `~/Library/Application Support/com.sowp.sowp/sowp.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\sowp\sowp\data\sowp.db`
    pub fn new(db_key: &[u8; 32]) -> Result<Self> {
        let db_path = default_path()?;
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        Self::open_at(&db_path, db_key)
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path, db_key: &[u8; 32]) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;

        apply_key(&conn, db_key)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

/// Location used by [`Database::new`].
fn default_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "sowp", "sowp").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join("sowp.db"))
}

#[cfg(feature = "sqlcipher")]
fn apply_key(conn: &Connection, db_key: &[u8; 32]) -> Result<()> {
    // raw-key form: the hex is used as the key itself, no KDF
    conn.execute_batch(&format!("PRAGMA key = \"x'{}'\";", hex::encode(db_key)))?;
    Ok(())
}

#[cfg(not(feature = "sqlcipher"))]
fn apply_key(_conn: &Connection, _db_key: &[u8; 32]) -> Result<()> {
    tracing::debug!("plain SQLite build, database key not applied");
    Ok(())
}
