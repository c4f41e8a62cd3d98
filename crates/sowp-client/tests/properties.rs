//! Property tests for the retention sweeper and the list controller.

mod common;

use proptest::prelude::*;

use common::{message, MemoryStore, T};
use sowp_client::catalog::CourseSort;
use sowp_client::{Listable, PaginatedList, RetentionPolicy, RetentionSweeper};
use sowp_shared::constants::{CLEANUP_COOLDOWN_MS, MILLIS_PER_DAY, RETENTION_HORIZON_MS};
use sowp_store::Course;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Message ages in milliseconds, spanning both sides of the horizon.
fn arb_ages() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..=30 * MILLIS_PER_DAY, 0..80)
}

fn arb_courses() -> impl Strategy<Value = Vec<Course>> {
    let words = prop::sample::select(vec![
        "Algebra", "Calculus", "Physics", "Poetry", "Databases", "Networks", "algebraic",
    ]);
    prop::collection::vec((words, 0i64..1_000), 0..60).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (word, created))| {
                let mut c = common::course(i as i64, &format!("{word} {i}"));
                c.created_at = created;
                c
            })
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["", "  ", "algebra", "ALGEBRA ", "cs00", "net", "zzz", "1"])
        .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn skipped_sweep_touches_nothing(
        ages in arb_ages(),
        since in 0i64..=CLEANUP_COOLDOWN_MS,
    ) {
        let store = MemoryStore::with_messages(
            ages.iter().enumerate().map(|(i, age)| message(&format!("m{i}"), T - age)),
        );
        let marker = T - since;
        store.set_marker(Some(marker));
        let sweeper = RetentionSweeper::new(store, RetentionPolicy::default());

        let outcome = runtime().block_on(sweeper.maybe_sweep(T)).unwrap();
        prop_assert!(outcome.is_skipped());
        prop_assert_eq!(sweeper.store().marker(), Some(marker));
        prop_assert_eq!(sweeper.store().delete_calls(), 0);
        prop_assert_eq!(sweeper.store().keys().len(), ages.len());
    }

    #[test]
    fn nothing_stale_survives_a_sweep(ages in arb_ages(), batch_size in 1usize..=60) {
        let store = MemoryStore::with_messages(
            ages.iter().enumerate().map(|(i, age)| message(&format!("m{i}"), T - age)),
        );
        let policy = RetentionPolicy { batch_size, ..RetentionPolicy::default() };
        let sweeper = RetentionSweeper::new(store, policy);

        let rt = runtime();
        let first = rt.block_on(sweeper.maybe_sweep(T)).unwrap();
        let stale = ages.iter().filter(|&&age| age > RETENTION_HORIZON_MS).count();
        prop_assert_eq!(first.deleted(), stale);
        prop_assert!(sweeper
            .store()
            .remaining()
            .iter()
            .all(|m| m.timestamp >= T - RETENTION_HORIZON_MS));

        let second = rt.block_on(sweeper.sweep(T)).unwrap();
        prop_assert_eq!(second.deleted(), 0);
    }

    #[test]
    fn page_is_a_slice_of_matches(
        courses in arb_courses(),
        query in arb_query(),
        page_size in 1usize..=15,
        sort in prop::sample::select(CourseSort::ALL.to_vec()),
        moves in prop::collection::vec(0u8..3, 0..10),
    ) {
        let mut list = PaginatedList::new(page_size);
        list.load(courses.clone());
        list.set_sort(sort);
        list.set_search(&query);
        prop_assert_eq!(list.current_page(), 0);

        for step in moves {
            match step {
                0 => { list.next_page(); }
                1 => { list.previous_page(); }
                _ => {
                    let before = list.current_page();
                    let total = list.total_pages();
                    prop_assert!(list.go_to_page(total).is_err());
                    prop_assert_eq!(list.current_page(), before);
                }
            }
            let info = list.page_info();
            prop_assert!(info.total_pages >= 1);
            prop_assert!(info.page >= 1 && info.page <= info.total_pages);
        }

        let needle = query.trim().to_lowercase();
        let page = list.current_page_items();
        prop_assert!(page.len() <= page_size);
        for course in &page {
            prop_assert!(needle.is_empty() || course.matches(&needle));
        }

        let start = list.current_page() * page_size;
        let filtered: Vec<&Course> = list.filtered().collect();
        let end = (start + page_size).min(filtered.len());
        prop_assert_eq!(page, filtered[start.min(end)..end].to_vec());

        if needle.is_empty() {
            prop_assert_eq!(list.filtered_len(), courses.len());
        }
    }
}
