use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id          INTEGER PRIMARY KEY NOT NULL,
    title       TEXT NOT NULL,
    short_title TEXT NOT NULL DEFAULT '',
    course_code TEXT NOT NULL DEFAULT '',
    instructor  TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    semester    TEXT NOT NULL DEFAULT '',
    level       TEXT NOT NULL DEFAULT '',
    tags        TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    members     INTEGER NOT NULL DEFAULT 0,
    is_public   INTEGER NOT NULL DEFAULT 1,   -- boolean 0/1
    created_at  INTEGER NOT NULL,             -- ms since epoch
    updated_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_courses_created ON courses(created_at DESC, id DESC);

CREATE TABLE IF NOT EXISTS topics (
    course_id   INTEGER NOT NULL,             -- FK -> courses(id)
    id          INTEGER NOT NULL,             -- unique within the course
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    content     TEXT NOT NULL DEFAULT '',
    video_id    TEXT NOT NULL DEFAULT '',
    tags        TEXT NOT NULL DEFAULT '',     -- free text, comma separated
    categories  TEXT NOT NULL DEFAULT '',
    semester    TEXT NOT NULL DEFAULT '',
    views       INTEGER NOT NULL DEFAULT 0,
    order_index INTEGER NOT NULL DEFAULT 0,
    is_public   INTEGER NOT NULL DEFAULT 1,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL,

    PRIMARY KEY (course_id, id),
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS users (
    id             TEXT PRIMARY KEY NOT NULL,
    full_name      TEXT NOT NULL,
    email          TEXT NOT NULL,
    semester       TEXT NOT NULL DEFAULT '',
    gender         TEXT NOT NULL DEFAULT '',
    degree         TEXT NOT NULL DEFAULT '',
    role           TEXT NOT NULL DEFAULT 'student',
    email_verified INTEGER NOT NULL DEFAULT 0,
    created_at     INTEGER NOT NULL
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
