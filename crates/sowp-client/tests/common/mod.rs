//! Test doubles and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use sowp_shared::constants::{MILLIS_PER_DAY, MILLIS_PER_HOUR};
use sowp_store::{Course, Message, MessageStore, StoreError};

/// Fixed "now" used across tests.
pub const T: i64 = 1_700_000_000_000;

pub fn message(key: &str, timestamp: i64) -> Message {
    Message {
        key: key.to_string(),
        author: "a@x.io".to_string(),
        body: format!("body of {key}"),
        timestamp,
        hidden_for: BTreeSet::new(),
    }
}

/// `stale` messages older than seven days and `fresh` younger ones.
pub fn mixed_messages(stale: usize, fresh: usize) -> Vec<Message> {
    let old = (0..stale).map(|i| message(&format!("old-{i:03}"), T - 8 * MILLIS_PER_DAY - i as i64));
    let new = (0..fresh).map(|i| message(&format!("new-{i:03}"), T - (i as i64) * MILLIS_PER_HOUR));
    old.chain(new).collect()
}

pub fn course(id: i64, title: &str) -> Course {
    Course {
        id,
        title: title.to_string(),
        short_title: String::new(),
        course_code: format!("CS{id:03}"),
        instructor: "Staff".to_string(),
        description: String::new(),
        semester: "Spring".to_string(),
        level: "Intermediate".to_string(),
        tags: Vec::new(),
        members: 0,
        is_public: true,
        created_at: id,
        updated_at: id,
    }
}

/// In-memory [`MessageStore`] with failure injection.
#[derive(Default)]
pub struct MemoryStore {
    messages: Mutex<BTreeMap<String, Message>>,
    marker: Mutex<Option<i64>>,
    /// Keys whose deletion fails.
    failing: Mutex<HashSet<String>>,
    /// Listed but already deleted by someone else.
    ghosts: Mutex<Vec<Message>>,
    fail_reads: Mutex<bool>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        let store = Self::default();
        {
            let mut map = store.messages.lock().unwrap();
            for m in messages {
                map.insert(m.key.clone(), m);
            }
        }
        store
    }

    pub fn set_marker(&self, at: Option<i64>) {
        *self.marker.lock().unwrap() = at;
    }

    pub fn marker(&self) -> Option<i64> {
        *self.marker.lock().unwrap()
    }

    pub fn fail_deletes_of(&self, keys: impl IntoIterator<Item = String>) {
        self.failing.lock().unwrap().extend(keys);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
        *self.fail_reads.lock().unwrap() = false;
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().unwrap() = true;
    }

    pub fn add_ghost(&self, message: Message) {
        self.ghosts.lock().unwrap().push(message);
    }

    pub fn keys(&self) -> Vec<String> {
        self.messages.lock().unwrap().keys().cloned().collect()
    }

    pub fn remaining(&self) -> Vec<Message> {
        self.messages.lock().unwrap().values().cloned().collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

impl MessageStore for MemoryStore {
    async fn list_messages(&self) -> sowp_store::Result<Vec<Message>> {
        if *self.fail_reads.lock().unwrap() {
            return Err(StoreError::Unavailable("read timed out".into()));
        }
        let mut all: Vec<Message> = self.messages.lock().unwrap().values().cloned().collect();
        all.extend(self.ghosts.lock().unwrap().iter().cloned());
        all.sort_by_key(|m| m.timestamp);
        Ok(all)
    }

    async fn count_messages_before(&self, cutoff: i64) -> sowp_store::Result<usize> {
        let all = self.list_messages().await?;
        Ok(all.iter().filter(|m| m.timestamp < cutoff).count())
    }

    async fn delete_message(&self, key: &str) -> sowp_store::Result<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // let the other deletes of the batch start before this one finishes
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(key) {
            return Err(StoreError::Unavailable(format!("delete of {key} rejected")));
        }
        Ok(self.messages.lock().unwrap().remove(key).is_some())
    }

    async fn cleanup_marker(&self) -> sowp_store::Result<Option<i64>> {
        Ok(self.marker())
    }

    async fn advance_cleanup_marker(&self, at: i64) -> sowp_store::Result<i64> {
        let mut marker = self.marker.lock().unwrap();
        let next = marker.map_or(at, |current| current.max(at));
        *marker = Some(next);
        Ok(next)
    }
}
