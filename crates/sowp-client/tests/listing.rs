//! Paginated list scenarios over catalog entities.

mod common;

use common::course;
use sowp_client::catalog::CourseSort;
use sowp_client::{AppState, ClientConfig, ClientError, EmptyState, ListView, PaginatedList};
use sowp_store::{CatalogDump, Course};

fn numbered(n: i64) -> Vec<Course> {
    (1..=n).map(|i| course(i, &format!("Course {i:02}"))).collect()
}

#[test]
fn twenty_three_courses_make_three_pages() {
    let mut list = PaginatedList::new(10);
    list.load(numbered(23));

    let info = list.page_info();
    assert_eq!(info.total_pages, 3);
    assert_eq!(info.total_items, 23);
    assert_eq!(list.current_page_items().len(), 10);

    list.go_to_page(2).unwrap();
    assert_eq!(list.current_page_items().len(), 3);
    assert_eq!(list.page_info().label(), "Page 3 of 3");
    assert!(!list.next_page());
    assert_eq!(list.current_page(), 2);
}

#[test]
fn algebra_search_finds_the_single_course() {
    let mut courses = numbered(10);
    courses[6].title = "Linear Algebra".to_string();

    let mut list = PaginatedList::new(10);
    list.load(courses);
    list.set_search("algebra");

    assert_eq!(list.filtered_len(), 1);
    assert_eq!(list.total_pages(), 1);
    let page = list.current_page_items();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "Linear Algebra");
    assert_eq!(list.summary().as_deref(), Some("Found: 1 course"));
}

#[test]
fn search_resets_to_first_page() {
    let mut list = PaginatedList::new(5);
    list.load(numbered(20));
    list.go_to_page(3).unwrap();

    list.set_search("course");
    assert_eq!(list.current_page(), 0);
    assert_eq!(list.filtered_len(), 20);
}

#[test]
fn rejected_jump_leaves_state_alone() {
    let mut list = PaginatedList::new(10);
    list.load(numbered(15));
    list.next_page();

    let err = list.go_to_page(9).unwrap_err();
    assert!(matches!(err, ClientError::PageOutOfRange { requested: 9, total: 2 }));
    assert_eq!(list.current_page(), 1);
}

#[test]
fn sorted_newest_first() {
    let mut list = PaginatedList::new(3);
    list.load(numbered(7));
    list.set_sort(CourseSort::Created);

    let ids: Vec<i64> = list.current_page_items().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![7, 6, 5]);
}

#[test]
fn empty_states_are_distinct() {
    let mut list: PaginatedList<Course> = PaginatedList::new(10);
    list.load(Vec::new());
    let ListView::Empty(none) = list.view() else {
        panic!("expected empty view");
    };
    assert_eq!(none, EmptyState::NoEntities { plural: "courses" });

    list.load(numbered(3));
    list.set_search("chemistry");
    let ListView::Empty(no_match) = list.view() else {
        panic!("expected empty view");
    };
    assert_ne!(none.message(), no_match.message());
    assert_eq!(list.total_pages(), 1);
}

#[tokio::test]
async fn app_state_loads_imported_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig {
        db_path: Some(dir.path().join("catalog.db")),
        page_size: 4,
        ..ClientConfig::default()
    };
    let state = AppState::open(config).unwrap();

    let dump = CatalogDump {
        courses: numbered(9),
        ..CatalogDump::default()
    };
    state.store().import_catalog(&dump).await.unwrap();

    let mut list = state.course_list().await.unwrap();
    assert_eq!(list.total_pages(), 3);
    assert_eq!(list.summary().as_deref(), Some("Total courses: 9"));
    // stored order is newest first
    assert_eq!(list.current_page_items()[0].id, 9);

    list.remove_where(|c| c.id > 4);
    assert_eq!(list.total_pages(), 1);
}
