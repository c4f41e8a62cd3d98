//! CRUD operations for [`Topic`] records.

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Topic;

const TOPIC_COLUMNS: &str = "id, course_id, name, description, content, video_id, tags, \
     categories, semester, views, order_index, is_public, created_at, updated_at";

impl Database {
    /// Insert or update a topic.  The course must exist.
    pub fn save_topic(&self, topic: &Topic) -> Result<()> {
        self.conn().execute(
            "INSERT INTO topics (id, course_id, name, description, content, video_id, tags,
                                 categories, semester, views, order_index, is_public,
                                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(course_id, id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                content = excluded.content,
                video_id = excluded.video_id,
                tags = excluded.tags,
                categories = excluded.categories,
                semester = excluded.semester,
                views = excluded.views,
                order_index = excluded.order_index,
                is_public = excluded.is_public,
                updated_at = excluded.updated_at",
            params![
                topic.id,
                topic.course_id,
                topic.name,
                topic.description,
                topic.content,
                topic.video_id,
                topic.tags,
                topic.categories,
                topic.semester,
                topic.views,
                topic.order_index,
                topic.is_public,
                topic.created_at,
                topic.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_topic(&self, course_id: i64, id: i64) -> Result<Topic> {
        self.conn()
            .query_row(
                &format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE course_id = ?1 AND id = ?2"),
                params![course_id, id],
                row_to_topic,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Topics of one course in their display order.
    pub fn list_topics_for_course(&self, course_id: i64) -> Result<Vec<Topic>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {TOPIC_COLUMNS} FROM topics
             WHERE course_id = ?1
             ORDER BY order_index ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![course_id], row_to_topic)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn delete_topic(&self, course_id: i64, id: i64) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM topics WHERE course_id = ?1 AND id = ?2",
            params![course_id, id],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_topic(row: &rusqlite::Row<'_>) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        course_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        content: row.get(4)?,
        video_id: row.get(5)?,
        tags: row.get(6)?,
        categories: row.get(7)?,
        semester: row.get(8)?,
        views: row.get(9)?,
        order_index: row.get(10)?,
        is_public: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}
