//! v001 -- Group chat schema.
//!
//! Creates `messages`, the per-viewer `message_hidden_for` table and the
//! `settings` key/value table that holds the cleanup marker and chat mode.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id        TEXT PRIMARY KEY NOT NULL,    -- UUID v4, assigned on insert
    author    TEXT NOT NULL,                -- sender e-mail
    body      TEXT NOT NULL,
    timestamp INTEGER NOT NULL              -- ms since epoch, never updated
);

CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);

-- ----------------------------------------------------------------
-- Hide-for-user markers (soft delete)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS message_hidden_for (
    message_id TEXT NOT NULL,               -- FK -> messages(id)
    viewer     TEXT NOT NULL,

    PRIMARY KEY (message_id, viewer),
    FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
);

-- ----------------------------------------------------------------
-- Settings (cleanup marker, chat mode)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY NOT NULL,
    value INTEGER NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
