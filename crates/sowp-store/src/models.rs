//! Domain model structs persisted in the local database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a UI layer or imported from a JSON dump.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A group chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique key assigned by the store on creation.
    pub key: String,
    /// Sender identifier (e-mail).
    pub author: String,
    pub body: String,
    /// Creation time in ms since epoch. Never changes after creation.
    pub timestamp: i64,
    /// Viewers for whom the message is hidden.
    #[serde(default)]
    pub hidden_for: BTreeSet<String>,
}

impl Message {
    pub fn is_hidden_for(&self, viewer: &str) -> bool {
        self.hidden_for.contains(viewer)
    }

    /// Whether the message falls before `cutoff` (strictly older).
    pub fn is_older_than(&self, cutoff: i64) -> bool {
        self.timestamp < cutoff
    }
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub short_title: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub instructor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub semester: String,
    /// e.g. "Beginner", "Intermediate", "Advanced"
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub members: i64,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_id: String,
    /// Comma separated, e.g. "OOP, Inheritance"
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub views: i64,
    /// Position inside the course.
    #[serde(default)]
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub email_verified: bool,
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Pagination cursor
// ---------------------------------------------------------------------------

/// Position after which a `created_at DESC, id DESC` page continues.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageCursor {
    pub created_at: i64,
    pub id: i64,
}

/// Bulk content accepted by the admin import command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDump {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub users: Vec<User>,
}

fn default_true() -> bool {
    true
}

fn default_role() -> String {
    "student".to_string()
}
