//! In-memory paginated list controller.
//!
//! Every list screen (courses, topics, users) keeps the full collection in
//! memory and derives what is shown from four inputs: a search string, a
//! sort key, a facet and the current page.  Any change recomputes the
//! filtered sequence; a search, sort or facet change also resets the page
//! to the first one.
//!
//! The page is always a contiguous slice of the filtered sequence and the
//! page index always lies in `[0, total_pages - 1]`, with at least one page
//! even when nothing matches.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::Serialize;
use sowp_shared::constants::DEFAULT_PAGE_SIZE;

use crate::error::{ClientError, Result};

/// An entity that can be shown in a [`PaginatedList`].
pub trait Listable {
    /// Sort keys offered by the screen.
    type Sort: Copy + PartialEq + Debug;
    /// Extra filter next to the search box; `()` when the screen has none.
    type Facet: Copy + PartialEq + Default + Debug;

    /// Lowercase singular noun ("course").
    const SINGULAR: &'static str;
    /// Lowercase plural noun ("courses").
    const PLURAL: &'static str;

    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` is already trimmed and lowercased and never empty.
    fn matches(&self, needle: &str) -> bool;

    /// Display order of `self` relative to `other` under `key`.
    fn compare(&self, other: &Self, key: Self::Sort) -> Ordering;

    /// Whether the entity passes `facet`.  Everything passes by default.
    fn in_facet(&self, facet: &Self::Facet) -> bool {
        let _ = facet;
        true
    }
}

/// Position shown under a list ("Page 2 of 3").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// 1-based page number.
    pub page: usize,
    pub total_pages: usize,
    /// Number of entities after search and facet filtering.
    pub total_items: usize,
}

impl PageInfo {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

/// Why a list shows nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmptyState {
    /// The collection itself is empty.
    NoEntities { plural: &'static str },
    /// The collection has entries but none pass the search or facet.
    NoMatches {
        plural: &'static str,
        query: String,
    },
}

impl EmptyState {
    pub fn message(&self) -> String {
        match self {
            EmptyState::NoEntities { plural } => format!("No {plural} available"),
            EmptyState::NoMatches { plural, query } if query.is_empty() => {
                format!("No {plural} match the current filter")
            }
            EmptyState::NoMatches { plural, query } => {
                format!("No {plural} found for \"{query}\"")
            }
        }
    }
}

/// What a screen renders.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    /// Nothing to show, with the reason.
    Empty(EmptyState),
    /// The current page's entities and where it sits.
    Page { items: Vec<&'a T>, info: PageInfo },
}

/// In-memory list screen state: search, sort, facet and page over a loaded
/// collection.
pub struct PaginatedList<T: Listable> {
    items: Vec<T>,
    /// Indices into `items`, filtered and in display order.
    visible: Vec<usize>,
    query: String,
    needle: String,
    sort: Option<T::Sort>,
    facet: T::Facet,
    page: usize,
    page_size: usize,
}

impl<T: Listable> Default for PaginatedList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Listable> PaginatedList<T> {
    /// A page size of zero is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            needle: String::new(),
            sort: None,
            facet: T::Facet::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Replace the collection after a reload.  Clears the search and goes
    /// back to the first page; the sort key and facet are kept.
    pub fn load(&mut self, entities: Vec<T>) {
        self.items = entities;
        self.query.clear();
        self.needle.clear();
        self.page = 0;
        self.recompute();
    }

    /// Filter by a trimmed, case-insensitive substring.  An empty query
    /// matches everything.  Goes back to the first page.
    pub fn set_search(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.needle = self.query.to_lowercase();
        self.page = 0;
        self.recompute();
    }

    /// Order by `key`.  Goes back to the first page.
    pub fn set_sort(&mut self, key: T::Sort) {
        self.sort = Some(key);
        self.page = 0;
        self.recompute();
    }

    /// Back to load order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.page = 0;
        self.recompute();
    }

    /// Goes back to the first page.
    pub fn set_facet(&mut self, facet: T::Facet) {
        self.facet = facet;
        self.page = 0;
        self.recompute();
    }

    /// Add entities without leaving the current page.
    pub fn append(&mut self, entities: impl IntoIterator<Item = T>) {
        self.items.extend(entities);
        self.recompute();
    }

    /// Drop every entity matching `pred`, keeping the page if it still
    /// exists.  Returns how many were removed.
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        let removed = before - self.items.len();
        if removed > 0 {
            self.recompute();
        }
        removed
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.total_pages() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a 0-based page.  Out of range is rejected without change.
    pub fn go_to_page(&mut self, page: usize) -> Result<()> {
        let total = self.total_pages();
        if page >= total {
            return Err(ClientError::PageOutOfRange {
                requested: page,
                total,
            });
        }
        self.page = page;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------

    /// Never less than one, even when nothing matches.
    pub fn total_pages(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    /// 0-based.
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Entities on the current page, in display order.
    pub fn current_page_items(&self) -> Vec<&T> {
        let start = (self.page * self.page_size).min(self.visible.len());
        let end = (start + self.page_size).min(self.visible.len());
        self.visible[start..end]
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page: self.page + 1,
            total_pages: self.total_pages(),
            total_items: self.visible.len(),
        }
    }

    /// The current page, or the empty state that explains why there is none.
    pub fn view(&self) -> ListView<'_, T> {
        if self.items.is_empty() {
            return ListView::Empty(EmptyState::NoEntities { plural: T::PLURAL });
        }
        if self.visible.is_empty() {
            return ListView::Empty(EmptyState::NoMatches {
                plural: T::PLURAL,
                query: self.query.clone(),
            });
        }
        ListView::Page {
            items: self.current_page_items(),
            info: self.page_info(),
        }
    }

    /// Count line above the list, `None` when there is nothing to count.
    pub fn summary(&self) -> Option<String> {
        let count = self.visible.len();
        if count == 0 {
            return None;
        }
        let noun = if count == 1 { T::SINGULAR } else { T::PLURAL };
        if self.is_filtered() {
            Some(format!("Found: {count} {noun}"))
        } else {
            Some(format!("Total {}: {count}", T::PLURAL))
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Option<T::Sort> {
        self.sort
    }

    pub fn facet(&self) -> T::Facet {
        self.facet
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whole collection in load order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Filtered collection in display order.
    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().map(|&i| &self.items[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn is_filtered(&self) -> bool {
        !self.needle.is_empty() || self.facet != T::Facet::default()
    }

    fn recompute(&mut self) {
        let needle = self.needle.as_str();
        let facet = &self.facet;
        let items = &self.items;

        self.visible = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.in_facet(facet))
            .filter(|(_, item)| needle.is_empty() || item.matches(needle))
            .map(|(i, _)| i)
            .collect();

        if let Some(key) = self.sort {
            // stable: equal keys keep load order
            self.visible
                .sort_by(|&a, &b| items[a].compare(&items[b], key));
        }

        let last = self.total_pages() - 1;
        if self.page > last {
            self.page = last;
        }
    }
}

/// Case-insensitive substring test for [`Listable::matches`].
pub fn contains_ci(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

/// Case-insensitive ordering for string sort keys.
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
