//! Incremental loading for long lists.
//!
//! [`ScrollPager`] loads a newest-first listing one page at a time, resuming
//! after the last loaded entity.  The next page is fetched when the user
//! reaches the end of what is loaded, unless a search is active (the search
//! filters what is already in memory), a fetch is already running, or the
//! source reported that nothing is left.
//!
//! A fetch is split into [`ScrollPager::begin_fetch`], which hands out a
//! [`FetchTicket`], and [`ScrollPager::finish_fetch`].  Refreshing or closing
//! the pager invalidates outstanding tickets, so a late completion is
//! dropped instead of being appended to a list it no longer belongs to.

use sowp_store::{Cursored, PageCursor, PageSource, StoreError};

use crate::listing::{EmptyState, Listable};

/// Permission to run one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    /// Resume after this entity (`None` for the first page).
    pub after: Option<PageCursor>,
    /// Page size requested from the source.
    pub limit: usize,
}

/// Result of one [`ScrollPager::finish_fetch`] or [`ScrollPager::load_more`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// This many entities were added.
    Appended(usize),
    /// The source returned an empty page; no further fetches.
    Exhausted,
    /// The fetch failed; the next attempt starts from the same cursor.
    Failed(String),
    /// No fetch was started (one is running, or the pager is exhausted or
    /// closed).
    Busy,
    /// The result belonged to an earlier generation and was dropped.
    Stale,
}

/// Incrementally loaded list with an in-memory search over what is loaded.
pub struct ScrollPager<T> {
    items: Vec<T>,
    query: String,
    needle: String,
    cursor: Option<PageCursor>,
    page_size: usize,
    generation: u64,
    in_flight: bool,
    exhausted: bool,
    closed: bool,
}

impl<T: Listable + Cursored> ScrollPager<T> {
    /// An empty pager fetching `page_size` entities at a time (at least one).
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            needle: String::new(),
            cursor: None,
            page_size: page_size.max(1),
            generation: 0,
            in_flight: false,
            exhausted: false,
            closed: false,
        }
    }

    /// Whether reaching `last_visible` (index into [`visible`]) should
    /// trigger the next fetch.
    ///
    /// [`visible`]: ScrollPager::visible
    pub fn should_load_more(&self, last_visible: usize) -> bool {
        let loaded = self.items.len();
        !self.closed
            && !self.in_flight
            && !self.exhausted
            && self.needle.is_empty()
            && loaded >= self.page_size
            && last_visible + 1 >= loaded
    }

    /// Start a fetch.  `None` when one is running or nothing is left.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.closed || self.in_flight || self.exhausted {
            return None;
        }
        self.in_flight = true;
        Some(FetchTicket {
            generation: self.generation,
            after: self.cursor,
            limit: self.page_size,
        })
    }

    /// Apply the result of the fetch started with `ticket`.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<T>, StoreError>,
    ) -> FetchOutcome {
        if self.closed || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping stale page"
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = false;

        match result {
            Err(e) => {
                tracing::warn!(error = %e, "failed to load more {}", T::PLURAL);
                FetchOutcome::Failed(e.to_string())
            }
            Ok(page) if page.is_empty() => {
                self.exhausted = true;
                tracing::debug!(loaded = self.items.len(), "no more {}", T::PLURAL);
                FetchOutcome::Exhausted
            }
            Ok(page) => {
                let count = page.len();
                self.cursor = page.last().map(Cursored::cursor);
                self.items.extend(page);
                FetchOutcome::Appended(count)
            }
        }
    }

    /// Fetch the next page from `source`.
    pub async fn load_more<S: PageSource<T>>(&mut self, source: &S) -> FetchOutcome {
        let Some(ticket) = self.begin_fetch() else {
            return FetchOutcome::Busy;
        };
        let result = source.fetch_page(ticket.after.as_ref(), ticket.limit).await;
        self.finish_fetch(ticket, result)
    }

    /// Forget everything loaded, clear the search and start over.
    pub fn refresh(&mut self) {
        self.items.clear();
        self.query.clear();
        self.needle.clear();
        self.cursor = None;
        self.exhausted = false;
        self.in_flight = false;
        self.generation += 1;
    }

    /// Stop accepting results.  Outstanding fetches become stale.
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = false;
        self.generation += 1;
    }

    /// Filter the loaded entities.  Blocks further fetches while non-empty.
    pub fn set_search(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.needle = self.query.to_lowercase();
    }

    /// Loaded entities passing the search, in load order.
    pub fn visible(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.needle.is_empty() || item.matches(&self.needle))
            .collect()
    }

    /// Why [`visible`](ScrollPager::visible) is empty, `None` if it is not.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.items.is_empty() {
            Some(EmptyState::NoEntities { plural: T::PLURAL })
        } else if self.visible().is_empty() {
            Some(EmptyState::NoMatches {
                plural: T::PLURAL,
                query: self.query.clone(),
            })
        } else {
            None
        }
    }

    /// Everything loaded so far, ignoring the search.
    pub fn loaded(&self) -> &[T] {
        &self.items
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// The source returned an empty page.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sowp_store::{Course, StoreClient};

    fn course(id: i64, title: &str) -> Course {
        Course {
            id,
            title: title.to_string(),
            short_title: String::new(),
            course_code: String::new(),
            instructor: String::new(),
            description: String::new(),
            semester: String::new(),
            level: String::new(),
            tags: Vec::new(),
            members: 0,
            is_public: true,
            created_at: id * 1_000,
            updated_at: id * 1_000,
        }
    }

    fn page(ids: std::ops::RangeInclusive<i64>) -> Vec<Course> {
        ids.rev().map(|id| course(id, &format!("Course {id}"))).collect()
    }

    #[test]
    fn test_second_begin_is_refused_while_in_flight() {
        let mut pager: ScrollPager<Course> = ScrollPager::new(10);
        let ticket = pager.begin_fetch().unwrap();
        assert_eq!(ticket.after, None);
        assert!(pager.begin_fetch().is_none());

        assert_eq!(
            pager.finish_fetch(ticket, Ok(page(11..=20))),
            FetchOutcome::Appended(10)
        );
        assert!(!pager.is_loading());

        let next = pager.begin_fetch().unwrap();
        assert_eq!(
            next.after,
            Some(PageCursor {
                created_at: 11_000,
                id: 11
            })
        );
    }

    #[test]
    fn test_guard_conditions() {
        let mut pager: ScrollPager<Course> = ScrollPager::new(10);
        let ticket = pager.begin_fetch().unwrap();
        pager.finish_fetch(ticket, Ok(page(1..=9)));
        // less than a full page loaded
        assert!(!pager.should_load_more(8));

        let ticket = pager.begin_fetch().unwrap();
        assert!(!pager.should_load_more(8));
        pager.finish_fetch(ticket, Ok(vec![course(0, "Course 0")]));

        assert!(!pager.should_load_more(5));
        assert!(pager.should_load_more(9));

        pager.set_search("course 3");
        assert!(!pager.should_load_more(9));
        pager.set_search("");

        let ticket = pager.begin_fetch().unwrap();
        assert_eq!(pager.finish_fetch(ticket, Ok(Vec::new())), FetchOutcome::Exhausted);
        assert!(!pager.should_load_more(9));
        assert!(pager.begin_fetch().is_none());
    }

    #[test]
    fn test_refresh_makes_outstanding_ticket_stale() {
        let mut pager: ScrollPager<Course> = ScrollPager::new(10);
        let ticket = pager.begin_fetch().unwrap();
        pager.set_search("x");
        pager.refresh();
        assert_eq!(pager.query(), "");

        assert_eq!(
            pager.finish_fetch(ticket, Ok(page(1..=10))),
            FetchOutcome::Stale
        );
        assert!(pager.loaded().is_empty());
        assert!(pager.begin_fetch().is_some());
    }

    #[test]
    fn test_close_drops_late_results() {
        let mut pager: ScrollPager<Course> = ScrollPager::new(10);
        let ticket = pager.begin_fetch().unwrap();
        pager.close();
        assert_eq!(
            pager.finish_fetch(ticket, Ok(page(1..=10))),
            FetchOutcome::Stale
        );
        assert!(pager.loaded().is_empty());
        assert!(pager.begin_fetch().is_none());
    }

    #[test]
    fn test_failure_keeps_cursor() {
        let mut pager: ScrollPager<Course> = ScrollPager::new(2);
        let ticket = pager.begin_fetch().unwrap();
        pager.finish_fetch(ticket, Ok(page(3..=4)));

        let ticket = pager.begin_fetch().unwrap();
        let outcome = pager.finish_fetch(ticket, Err(StoreError::Unavailable("offline".into())));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));

        let retry = pager.begin_fetch().unwrap();
        assert_eq!(retry.after.map(|c| c.id), Some(3));
    }

    #[tokio::test]
    async fn test_load_more_walks_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreClient::open_at(&dir.path().join("scroll.db"), &[0u8; 32]).unwrap();
        store
            .call(|db| {
                for c in page(1..=5) {
                    db.save_course(&c)?;
                }
                Ok(())
            })
            .await
            .unwrap();

        let mut pager: ScrollPager<Course> = ScrollPager::new(2);
        assert_eq!(pager.load_more(&store).await, FetchOutcome::Appended(2));
        assert_eq!(pager.load_more(&store).await, FetchOutcome::Appended(2));
        assert_eq!(pager.load_more(&store).await, FetchOutcome::Appended(1));
        assert_eq!(pager.load_more(&store).await, FetchOutcome::Exhausted);
        assert_eq!(pager.load_more(&store).await, FetchOutcome::Busy);

        let ids: Vec<i64> = pager.loaded().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
        assert!(pager.empty_state().is_none());
    }
}
