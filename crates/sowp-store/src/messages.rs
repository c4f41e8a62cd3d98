//! CRUD operations for group chat [`Message`] records.

use std::collections::{BTreeSet, HashMap};

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Store a new message under a freshly generated key.
    pub fn create_message(&self, author: &str, body: &str, timestamp: i64) -> Result<Message> {
        let key = Uuid::new_v4().to_string();

        self.conn().execute(
            "INSERT INTO messages (id, author, body, timestamp)
             VALUES (?1, ?2, ?3, ?4)",
            params![key, author, body, timestamp],
        )?;

        Ok(Message {
            key,
            author: author.to_string(),
            body: body.to_string(),
            timestamp,
            hidden_for: BTreeSet::new(),
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_message(&self, key: &str) -> Result<Message> {
        let mut message = self
            .conn()
            .query_row(
                "SELECT id, author, body, timestamp FROM messages WHERE id = ?1",
                params![key],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        let mut stmt = self
            .conn()
            .prepare("SELECT viewer FROM message_hidden_for WHERE message_id = ?1")?;
        let rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
        for viewer in rows {
            message.hidden_for.insert(viewer?);
        }
        Ok(message)
    }

    /// All messages, oldest first.
    pub fn list_messages(&self) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, author, body, timestamp
             FROM messages
             ORDER BY timestamp ASC, id ASC",
        )?;

        let rows = stmt.query_map([], row_to_message)?;
        let mut hidden = self.load_hidden_sets()?;

        let mut messages = Vec::new();
        for row in rows {
            let mut message = row?;
            if let Some(viewers) = hidden.remove(&message.key) {
                message.hidden_for = viewers;
            }
            messages.push(message);
        }
        Ok(messages)
    }

    /// Messages a viewer can see, oldest first.
    pub fn list_messages_visible_to(&self, viewer: &str) -> Result<Vec<Message>> {
        Ok(self
            .list_messages()?
            .into_iter()
            .filter(|m| !m.is_hidden_for(viewer))
            .collect())
    }

    /// Number of messages strictly older than `cutoff`.
    pub fn count_messages_before(&self, cutoff: i64) -> Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM messages WHERE timestamp < ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn count_messages(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Hide a message for one viewer.  Returns `false` when it was already
    /// hidden for them.
    pub fn hide_message_for(&self, key: &str, viewer: &str) -> Result<bool> {
        let exists: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM messages WHERE id = ?1)",
            params![key],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound);
        }

        let affected = self.conn().execute(
            "INSERT OR IGNORE INTO message_hidden_for (message_id, viewer) VALUES (?1, ?2)",
            params![key, viewer],
        )?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Remove a message for everyone.  Returns `true` if a row was deleted.
    pub fn delete_message(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM messages WHERE id = ?1", params![key])?;
        Ok(affected > 0)
    }

    fn load_hidden_sets(&self) -> Result<HashMap<String, BTreeSet<String>>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT message_id, viewer FROM message_hidden_for")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map: HashMap<String, BTreeSet<String>> = HashMap::new();
        for row in rows {
            let (key, viewer) = row?;
            map.entry(key).or_default().insert(viewer);
        }
        Ok(map)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        key: row.get(0)?,
        author: row.get(1)?,
        body: row.get(2)?,
        timestamp: row.get(3)?,
        hidden_for: BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("chat.db"), &[0u8; 32]).unwrap();
        (db, dir)
    }

    #[test]
    fn test_create_and_get() {
        let (db, _dir) = test_db();
        let msg = db.create_message("a@x.io", "hello", 1_000).unwrap();

        let loaded = db.get_message(&msg.key).unwrap();
        assert_eq!(loaded, msg);
    }

    #[test]
    fn test_keys_are_unique() {
        let (db, _dir) = test_db();
        let a = db.create_message("a@x.io", "one", 1).unwrap();
        let b = db.create_message("a@x.io", "two", 1).unwrap();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_list_is_ordered_by_timestamp() {
        let (db, _dir) = test_db();
        db.create_message("a@x.io", "late", 30).unwrap();
        db.create_message("a@x.io", "early", 10).unwrap();
        db.create_message("a@x.io", "middle", 20).unwrap();

        let bodies: Vec<_> = db
            .list_messages()
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_hide_for_user_only_appends() {
        let (db, _dir) = test_db();
        let msg = db.create_message("a@x.io", "hi", 5).unwrap();

        assert!(db.hide_message_for(&msg.key, "b@x.io").unwrap());
        assert!(!db.hide_message_for(&msg.key, "b@x.io").unwrap());
        assert!(db.hide_message_for(&msg.key, "c@x.io").unwrap());

        let loaded = db.get_message(&msg.key).unwrap();
        assert_eq!(loaded.hidden_for.len(), 2);
        assert_eq!(loaded.timestamp, 5);

        assert!(db.list_messages_visible_to("b@x.io").unwrap().is_empty());
        assert_eq!(db.list_messages_visible_to("a@x.io").unwrap().len(), 1);
    }

    #[test]
    fn test_hide_missing_message_is_not_found() {
        let (db, _dir) = test_db();
        assert!(matches!(
            db.hide_message_for("nope", "b@x.io"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn test_delete_cascades_hidden_markers() {
        let (db, _dir) = test_db();
        let msg = db.create_message("a@x.io", "bye", 5).unwrap();
        db.hide_message_for(&msg.key, "b@x.io").unwrap();

        assert!(db.delete_message(&msg.key).unwrap());
        assert!(!db.delete_message(&msg.key).unwrap());
        assert!(matches!(db.get_message(&msg.key), Err(StoreError::NotFound)));

        let orphans: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM message_hidden_for", [], |r| r.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_count_before_cutoff() {
        let (db, _dir) = test_db();
        for ts in [1, 2, 3, 10, 11] {
            db.create_message("a@x.io", "m", ts).unwrap();
        }
        assert_eq!(db.count_messages_before(10).unwrap(), 3);
        assert_eq!(db.count_messages().unwrap(), 5);
    }
}
