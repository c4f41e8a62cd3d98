//! Integer settings: the retention cleanup marker and the chat mode flag.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

const LAST_CLEANUP: &str = "last_cleanup";
const CHAT_MODE: &str = "chat_mode";

impl Database {
    /// Time of the last retention sweep, `None` if no sweep ever ran.
    pub fn cleanup_marker(&self) -> Result<Option<i64>> {
        self.get_setting(LAST_CLEANUP)
    }

    /// Move the cleanup marker forward to `at` and return the stored value.
    ///
    /// The write is `MAX(current, at)`, so the marker never goes backwards even
    /// when two sweepers race.
    pub fn advance_cleanup_marker(&self, at: i64) -> Result<i64> {
        self.conn().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = MAX(value, excluded.value)",
            params![LAST_CLEANUP, at],
        )?;
        Ok(self.get_setting(LAST_CLEANUP)?.unwrap_or(at))
    }

    /// Whether the group chat accepts new messages.  Defaults to open.
    pub fn chat_mode(&self) -> Result<bool> {
        Ok(self.get_setting(CHAT_MODE)?.map(|v| v != 0).unwrap_or(true))
    }

    pub fn set_chat_mode(&self, open: bool) -> Result<()> {
        self.conn().execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![CHAT_MODE, open as i64],
        )?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<i64>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("settings.db"), &[0u8; 32]).unwrap();
        (db, dir)
    }

    #[test]
    fn test_marker_absent_initially() {
        let (db, _dir) = test_db();
        assert_eq!(db.cleanup_marker().unwrap(), None);
    }

    #[test]
    fn test_marker_never_moves_backwards() {
        let (db, _dir) = test_db();
        assert_eq!(db.advance_cleanup_marker(100).unwrap(), 100);
        assert_eq!(db.advance_cleanup_marker(50).unwrap(), 100);
        assert_eq!(db.advance_cleanup_marker(150).unwrap(), 150);
        assert_eq!(db.cleanup_marker().unwrap(), Some(150));
    }

    #[test]
    fn test_chat_mode_defaults_open() {
        let (db, _dir) = test_db();
        assert!(db.chat_mode().unwrap());
        db.set_chat_mode(false).unwrap();
        assert!(!db.chat_mode().unwrap());
        db.set_chat_mode(true).unwrap();
        assert!(db.chat_mode().unwrap());
    }
}
