//! Pagination math.
//!
//! [`compute_window`] decides which page indicators a pager shows and
//! [`compute_slice`] which records belong to the current page. Neither clamps:
//! keeping `current_page` inside `[1, total_pages]` is the screen's job, see
//! [`PageState::clamped`].

use serde::Serialize;
use std::ops::Range;

/// Pages shown in full before the window collapses into ellipses.
const MAX_VISIBLE: usize = 5;

/// One indicator in a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "lowercase")]
pub enum PageToken {
    /// A clickable page number (1-based).
    Page(usize),
    /// A gap of one or more hidden pages.
    Ellipsis,
}

/// The page indicators for `current_page` out of `total_pages`.
///
/// The result never holds more than 7 tokens. When there are more than five
/// pages it always starts with page 1 and ends with `total_pages`.
pub fn compute_window(current_page: usize, total_pages: usize) -> Vec<PageToken> {
    if total_pages <= MAX_VISIBLE {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let mut tokens = Vec::with_capacity(7);
    if current_page <= 3 {
        tokens.extend((1..=4).map(PageToken::Page));
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total_pages));
    } else if current_page >= total_pages - 2 {
        tokens.push(PageToken::Page(1));
        tokens.push(PageToken::Ellipsis);
        tokens.extend((total_pages - 3..=total_pages).map(PageToken::Page));
    } else {
        tokens.push(PageToken::Page(1));
        tokens.push(PageToken::Ellipsis);
        tokens.extend((current_page - 1..=current_page + 1).map(PageToken::Page));
        tokens.push(PageToken::Ellipsis);
        tokens.push(PageToken::Page(total_pages));
    }
    tokens
}

/// Record index bounds `[start, end)` of `current_page`.
///
/// `start` may exceed `end` when `current_page` lies past the last page; use
/// [`page_of`] to take the slice without panicking.
pub fn compute_slice(current_page: usize, items_per_page: usize, total_items: usize) -> (usize, usize) {
    let start = current_page.saturating_sub(1).saturating_mul(items_per_page);
    let end = current_page.saturating_mul(items_per_page).min(total_items);
    (start, end)
}

/// The records of `current_page`, or an empty slice when the page is out of range.
pub fn page_of<T>(records: &[T], current_page: usize, items_per_page: usize) -> &[T] {
    let (start, end) = compute_slice(current_page, items_per_page, records.len());
    records.get(start..end).unwrap_or(&[])
}

/// Pagination state of one screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub total_items: usize,
}

impl PageState {
    /// Build a page state, taking `current_page` as given.
    ///
    /// `items_per_page` of zero is treated as one.
    pub fn new(current_page: usize, items_per_page: usize, total_items: usize) -> Self {
        let items_per_page = items_per_page.max(1);
        Self {
            current_page,
            total_pages: total_items.div_ceil(items_per_page),
            items_per_page,
            total_items,
        }
    }

    /// Build a page state with `current_page` pulled back into
    /// `[1, max(total_pages, 1)]`.
    ///
    /// Screens call this after filtering, so a page that disappeared because
    /// the collection shrank falls back to the last remaining page.
    pub fn clamped(current_page: usize, items_per_page: usize, total_items: usize) -> Self {
        let mut state = Self::new(current_page, items_per_page, total_items);
        state.current_page = current_page.clamp(1, state.total_pages.max(1));
        state
    }

    /// Page indicators for the pager.
    pub fn window(&self) -> Vec<PageToken> {
        compute_window(self.current_page, self.total_pages)
    }

    /// Index range of the current page.
    pub fn range(&self) -> Range<usize> {
        let (start, end) = compute_slice(self.current_page, self.items_per_page, self.total_items);
        start..end
    }

    /// The current page's records.
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        page_of(records, self.current_page, self.items_per_page)
    }

    /// Whether a "Previous" control is enabled.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a "Next" control is enabled.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based `(first, last)` item numbers for a "Showing X to Y of Z" line.
    ///
    /// `None` when the current page holds no items.
    pub fn showing(&self) -> Option<(usize, usize)> {
        let range = self.range();
        if range.start >= range.end {
            return None;
        }
        Some((range.start + 1, range.end))
    }
}
