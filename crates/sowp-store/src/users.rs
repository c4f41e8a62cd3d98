use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, full_name, email, semester, gender, degree, role, email_verified, created_at";

impl Database {
    pub fn save_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (id, full_name, email, semester, gender, degree, role,
                                email_verified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email,
                semester = excluded.semester,
                gender = excluded.gender,
                degree = excluded.degree,
                role = excluded.role,
                email_verified = excluded.email_verified",
            params![
                user.id,
                user.full_name,
                user.email,
                user.semester,
                user.gender,
                user.degree,
                user.role,
                user.email_verified,
                user.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> Result<User> {
        self.conn()
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"))?;
        let rows = stmt.query_map([], row_to_user)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn set_email_verified(&self, id: &str, verified: bool) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE users SET email_verified = ?1 WHERE id = ?2",
            params![verified, id],
        )?;
        Ok(affected > 0)
    }

    pub fn delete_user(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        semester: row.get(3)?,
        gender: row.get(4)?,
        degree: row.get(5)?,
        role: row.get(6)?,
        email_verified: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("users.db"), &[0u8; 32]).unwrap();

        let user = User {
            id: "u1".into(),
            full_name: "Grace Hopper".into(),
            email: "grace@x.io".into(),
            semester: "3".into(),
            gender: String::new(),
            degree: "BSCS".into(),
            role: "student".into(),
            email_verified: false,
            created_at: 10,
        };
        db.save_user(&user).unwrap();
        assert_eq!(db.get_user("u1").unwrap(), user);

        assert!(db.set_email_verified("u1", true).unwrap());
        assert!(db.get_user("u1").unwrap().email_verified);
        assert!(!db.set_email_verified("missing", true).unwrap());

        assert_eq!(db.list_users().unwrap().len(), 1);
        assert!(db.delete_user("u1").unwrap());
        assert!(matches!(db.get_user("u1"), Err(StoreError::NotFound)));
    }
}
