//! Async, shareable handle over the local [`Database`].
//!
//! [`StoreClient`] is what the application hands to its services: it is
//! cheap to clone, serialises access to the single SQLite connection, and
//! broadcasts a [`StoreEvent`] for every chat mutation so open chat screens
//! can refresh without polling.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use crate::database::Database;
use crate::error::Result;
use crate::models::{CatalogDump, Course, Message, PageCursor};
use crate::traits::{MessageStore, PageSource};

/// Capacity of the change-event channel.  Slow subscribers that fall further
/// behind receive `RecvError::Lagged` and should reload.
const EVENT_BUFFER: usize = 256;

/// Change notifications pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    MessageAdded { message: Message },
    MessageHidden { key: String, viewer: String },
    MessageDeleted { key: String },
    ChatModeChanged { open: bool },
}

/// Counts returned by [`StoreClient::import_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub courses: usize,
    pub topics: usize,
    pub users: usize,
}

#[derive(Clone)]
pub struct StoreClient {
    db: Arc<Mutex<Database>>,
    events: broadcast::Sender<StoreEvent>,
}

impl StoreClient {
    pub fn new(db: Database) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            db: Arc::new(Mutex::new(db)),
            events,
        }
    }

    pub fn open_at(path: &Path, db_key: &[u8; 32]) -> Result<Self> {
        Ok(Self::new(Database::open_at(path, db_key)?))
    }

    /// Subscribe to chat changes made through this client (and its clones).
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Run a synchronous database operation under the connection lock.
    pub async fn call<R>(&self, f: impl FnOnce(&Database) -> Result<R>) -> Result<R> {
        let db = self.db.lock().await;
        f(&db)
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    pub async fn insert_message(&self, author: &str, body: &str, timestamp: i64) -> Result<Message> {
        let message = self
            .call(|db| db.create_message(author, body, timestamp))
            .await?;
        tracing::debug!(key = %message.key, author, "message stored");
        self.emit(StoreEvent::MessageAdded {
            message: message.clone(),
        });
        Ok(message)
    }

    pub async fn messages_visible_to(&self, viewer: &str) -> Result<Vec<Message>> {
        self.call(|db| db.list_messages_visible_to(viewer)).await
    }

    pub async fn hide_message_for(&self, key: &str, viewer: &str) -> Result<bool> {
        let changed = self.call(|db| db.hide_message_for(key, viewer)).await?;
        if changed {
            self.emit(StoreEvent::MessageHidden {
                key: key.to_string(),
                viewer: viewer.to_string(),
            });
        }
        Ok(changed)
    }

    pub async fn chat_mode(&self) -> Result<bool> {
        self.call(|db| db.chat_mode()).await
    }

    pub async fn set_chat_mode(&self, open: bool) -> Result<()> {
        self.call(|db| db.set_chat_mode(open)).await?;
        tracing::info!(open, "chat mode changed");
        self.emit(StoreEvent::ChatModeChanged { open });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Save every course, topic and user of `dump` in one transaction.
    pub async fn import_catalog(&self, dump: &CatalogDump) -> Result<ImportSummary> {
        self.call(|db| {
            let tx = db.conn().unchecked_transaction()?;
            for course in &dump.courses {
                db.save_course(course)?;
            }
            for topic in &dump.topics {
                db.save_topic(topic)?;
            }
            for user in &dump.users {
                db.save_user(user)?;
            }
            tx.commit()?;
            Ok(ImportSummary {
                courses: dump.courses.len(),
                topics: dump.topics.len(),
                users: dump.users.len(),
            })
        })
        .await
    }

    fn emit(&self, event: StoreEvent) {
        // no subscribers is the common case outside chat screens
        let _ = self.events.send(event);
    }
}

impl MessageStore for StoreClient {
    async fn list_messages(&self) -> Result<Vec<Message>> {
        self.call(|db| db.list_messages()).await
    }

    async fn count_messages_before(&self, cutoff: i64) -> Result<usize> {
        self.call(|db| db.count_messages_before(cutoff)).await
    }

    async fn delete_message(&self, key: &str) -> Result<bool> {
        let deleted = self.call(|db| db.delete_message(key)).await?;
        if deleted {
            self.emit(StoreEvent::MessageDeleted {
                key: key.to_string(),
            });
        }
        Ok(deleted)
    }

    async fn cleanup_marker(&self) -> Result<Option<i64>> {
        self.call(|db| db.cleanup_marker()).await
    }

    async fn advance_cleanup_marker(&self, at: i64) -> Result<i64> {
        self.call(|db| db.advance_cleanup_marker(at)).await
    }
}

impl PageSource<Course> for StoreClient {
    async fn fetch_page(&self, after: Option<&PageCursor>, limit: usize) -> Result<Vec<Course>> {
        self.call(|db| db.list_courses_page(after, limit)).await
    }
}
