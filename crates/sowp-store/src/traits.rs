//! Store contracts consumed by the client policies.
//!
//! The retention sweeper and the scroll pager only see these traits, so a
//! test double or a remote backend can stand in for [`StoreClient`].
//!
//! [`StoreClient`]: crate::StoreClient

use crate::error::Result;
use crate::models::{Course, Message, PageCursor};

/// Message operations needed by the retention sweeper.
#[allow(async_fn_in_trait)]
pub trait MessageStore {
    /// Read every stored message.
    async fn list_messages(&self) -> Result<Vec<Message>>;

    /// Number of messages strictly older than `cutoff`.
    async fn count_messages_before(&self, cutoff: i64) -> Result<usize>;

    /// Delete one message for everyone.
    ///
    /// # Returns
    /// * `Ok(true)` - the message was removed
    /// * `Ok(false)` - no message with that key (already gone)
    async fn delete_message(&self, key: &str) -> Result<bool>;

    /// Time of the last sweep, `None` if none ever ran.
    async fn cleanup_marker(&self) -> Result<Option<i64>>;

    /// Advance the cleanup marker to `at` (never backwards) and return the
    /// stored value.
    async fn advance_cleanup_marker(&self, at: i64) -> Result<i64>;
}

/// Cursor-based page reads, newest first.
#[allow(async_fn_in_trait)]
pub trait PageSource<T> {
    /// Fetch at most `limit` items strictly after `after` (from the start
    /// when `None`).  An empty page means there is nothing more.
    async fn fetch_page(&self, after: Option<&PageCursor>, limit: usize) -> Result<Vec<T>>;
}

/// Entities that can resume a `created_at DESC, id DESC` listing.
pub trait Cursored {
    /// Position of this entity in the listing.
    fn cursor(&self) -> PageCursor;
}

impl Cursored for Course {
    fn cursor(&self) -> PageCursor {
        PageCursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}
