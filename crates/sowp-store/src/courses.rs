//! CRUD operations for [`Course`] records.

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Course, PageCursor};

const COURSE_COLUMNS: &str = "id, title, short_title, course_code, instructor, description, \
     semester, level, tags, members, is_public, created_at, updated_at";

impl Database {
    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    /// Insert a course, or update every column of an existing one with the
    /// same id.  Topics of an existing course are left in place.
    pub fn save_course(&self, course: &Course) -> Result<()> {
        let tags = serde_json::to_string(&course.tags)?;
        self.conn().execute(
            "INSERT INTO courses (id, title, short_title, course_code, instructor, description,
                                  semester, level, tags, members, is_public, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                short_title = excluded.short_title,
                course_code = excluded.course_code,
                instructor = excluded.instructor,
                description = excluded.description,
                semester = excluded.semester,
                level = excluded.level,
                tags = excluded.tags,
                members = excluded.members,
                is_public = excluded.is_public,
                updated_at = excluded.updated_at",
            params![
                course.id,
                course.title,
                course.short_title,
                course.course_code,
                course.instructor,
                course.description,
                course.semester,
                course.level,
                tags,
                course.members,
                course.is_public,
                course.created_at,
                course.updated_at,
            ],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_course(&self, id: i64) -> Result<Course> {
        self.conn()
            .query_row(
                &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"),
                params![id],
                row_to_course,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all courses, newest first.
    pub fn list_courses(&self) -> Result<Vec<Course>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], row_to_course)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    /// One page of courses, newest first, starting after `after`.
    pub fn list_courses_page(&self, after: Option<&PageCursor>, limit: usize) -> Result<Vec<Course>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = match after {
            Some(cursor) => {
                let mut stmt = self.conn().prepare(&format!(
                    "SELECT {COURSE_COLUMNS} FROM courses
                     WHERE (created_at, id) < (?1, ?2)
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?3"
                ))?;
                let rows = stmt.query_map(params![cursor.created_at, cursor.id, limit], row_to_course)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
            None => {
                let mut stmt = self.conn().prepare(&format!(
                    "SELECT {COURSE_COLUMNS} FROM courses
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1"
                ))?;
                let rows = stmt.query_map(params![limit], row_to_course)?;
                rows.collect::<std::result::Result<Vec<_>, _>>()
            }
        };
        rows.map_err(StoreError::Sqlite)
    }

    pub fn count_courses(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM courses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    // ON DELETE CASCADE: topics go with it
    pub fn delete_course(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM courses WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn row_to_course(row: &rusqlite::Row<'_>) -> rusqlite::Result<Course> {
    let tags_json: String = row.get(8)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Course {
        id: row.get(0)?,
        title: row.get(1)?,
        short_title: row.get(2)?,
        course_code: row.get(3)?,
        instructor: row.get(4)?,
        description: row.get(5)?,
        semester: row.get(6)?,
        level: row.get(7)?,
        tags,
        members: row.get(9)?,
        is_public: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
