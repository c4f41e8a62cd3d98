//! Application composition root.
//!
//! [`AppState`] opens the store once and hands clones of the same
//! [`StoreClient`] to every service, replacing a process-wide database
//! singleton.  Screens get their list controllers from here so page size
//! and the loaded data come from one place.

use sowp_shared::time::now_millis;
use sowp_store::{Course, Database, StoreClient, StoreError, Topic, User};

use crate::chat::ChatService;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::listing::PaginatedList;
use crate::retention::{RetentionSweeper, SweepOutcome};
use crate::scroll::ScrollPager;

pub struct AppState {
    config: ClientConfig,
    store: StoreClient,
    chat: ChatService,
    sweeper: RetentionSweeper<StoreClient>,
}

impl AppState {
    /// Open the database named by `config` (or the platform default).
    pub fn open(config: ClientConfig) -> Result<Self> {
        let db = match &config.db_path {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    std::fs::create_dir_all(dir).map_err(StoreError::from)?;
                }
                Database::open_at(path, &config.db_key)?
            }
            None => Database::new(&config.db_key)?,
        };
        Ok(Self::with_store(config, StoreClient::new(db)))
    }

    pub fn with_store(config: ClientConfig, store: StoreClient) -> Self {
        let chat = ChatService::new(store.clone());
        let sweeper = RetentionSweeper::new(store.clone(), config.retention);
        Self {
            config,
            store,
            chat,
            sweeper,
        }
    }

    /// Start-up work: an automatic retention sweep if one is due.
    pub async fn on_start(&self) -> Result<SweepOutcome> {
        Ok(self.sweeper.maybe_sweep(now_millis()).await?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    pub fn sweeper(&self) -> &RetentionSweeper<StoreClient> {
        &self.sweeper
    }

    // ------------------------------------------------------------------
    // List screens
    // ------------------------------------------------------------------

    pub async fn course_list(&self) -> Result<PaginatedList<Course>> {
        let courses = self.store.call(|db| db.list_courses()).await?;
        Ok(self.list_of(courses))
    }

    pub async fn topic_list(&self, course_id: i64) -> Result<PaginatedList<Topic>> {
        let topics = self
            .store
            .call(|db| db.list_topics_for_course(course_id))
            .await?;
        Ok(self.list_of(topics))
    }

    pub async fn user_list(&self) -> Result<PaginatedList<User>> {
        let users = self.store.call(|db| db.list_users()).await?;
        Ok(self.list_of(users))
    }

    /// Incremental course feed; call [`ScrollPager::load_more`] with
    /// [`AppState::store`] to fill it.
    pub fn course_feed(&self) -> ScrollPager<Course> {
        ScrollPager::new(self.config.page_size)
    }

    fn list_of<T: crate::listing::Listable>(&self, entities: Vec<T>) -> PaginatedList<T> {
        let mut list = PaginatedList::new(self.config.page_size);
        list.load(entities);
        tracing::debug!(count = list.len(), kind = T::PLURAL, "list loaded");
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sowp_store::MessageStore;

    #[tokio::test]
    async fn test_open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("nested").join("app.db")),
            ..ClientConfig::default()
        };

        let state = AppState::open(config).unwrap();
        assert!(dir.path().join("nested").join("app.db").exists());

        let outcome = state.on_start().await.unwrap();
        assert!(!outcome.is_skipped());
        assert!(state.store().cleanup_marker().await.unwrap().is_some());

        // second start inside the cooldown
        assert!(state.on_start().await.unwrap().is_skipped());
    }

    #[tokio::test]
    async fn test_services_share_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            db_path: Some(dir.path().join("app.db")),
            ..ClientConfig::default()
        };
        let state = AppState::open(config).unwrap();

        state.chat().send("a@x.io", "User", "hello").await.unwrap();
        assert_eq!(state.store().list_messages().await.unwrap().len(), 1);
        assert_eq!(state.sweeper().count_stale(now_millis()).await.unwrap(), 0);

        let courses = state.course_list().await.unwrap();
        assert!(courses.is_empty());
        assert_eq!(courses.page_size(), 10);
    }
}
