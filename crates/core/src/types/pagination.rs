//! Client-side pagination of already-fetched lists.
//!
//! Pages are 1-based. Requested pages outside the valid range are clamped,
//! so a stale page number (e.g. after cancelling the last order on a page)
//! never yields an out-of-bounds slice.

use serde::Serialize;

/// Products per page on category and "all products" listings.
pub const PRODUCTS_PER_PAGE: usize = 6;

/// Testimonials per page.
pub const TESTIMONIALS_PER_PAGE: usize = 9;

/// Orders or cart lines per page on the profile screen.
pub const PROFILE_ITEMS_PER_PAGE: usize = 3;

/// Number of products featured on the home screen.
pub const FEATURED_PRODUCT_COUNT: usize = 4;

/// Navigators with at most this many pages list every page.
const FULL_NAVIGATOR_MAX: usize = 5;

/// One entry in a page navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageMarker {
    /// A clickable page number.
    Page(usize),
    /// Elided range of pages.
    Gap,
}

/// Splits a list into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    /// Create a paginator. A page size of zero is treated as one.
    #[must_use]
    pub const fn new(per_page: usize) -> Self {
        Self {
            per_page: if per_page == 0 { 1 } else { per_page },
        }
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Total number of pages for `len` items (zero for an empty list).
    #[must_use]
    pub const fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.per_page)
    }

    /// Return the requested page, clamped into the valid range.
    #[must_use]
    pub fn page<'a, T>(&self, items: &'a [T], requested: usize) -> Page<'a, T> {
        let total_pages = self.total_pages(items.len());
        let current = requested.clamp(1, total_pages.max(1));
        let start = ((current - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());

        Page {
            items: items.get(start..end).unwrap_or_default(),
            current,
            total_pages,
            total_items: items.len(),
        }
    }
}

/// A single page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// Current page number (1-based, clamped).
    pub current: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    /// Whether a navigator should be shown at all.
    #[must_use]
    pub const fn needs_navigation(&self) -> bool {
        self.total_pages > 1
    }

    /// Windowed page navigator.
    ///
    /// Lists every page when there are at most five. Otherwise keeps the
    /// first and last page visible and shows a window around the current
    /// page, with gaps for the elided ranges.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<PageMarker> {
        use PageMarker::{Gap, Page};

        let total = self.total_pages;
        let current = self.current;

        if total <= FULL_NAVIGATOR_MAX {
            return (1..=total).map(Page).collect();
        }

        if current <= 3 {
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(total)]
        } else if current >= total - 2 {
            vec![
                Page(1),
                Gap,
                Page(total - 3),
                Page(total - 2),
                Page(total - 1),
                Page(total),
            ]
        } else {
            vec![
                Page(1),
                Gap,
                Page(current - 1),
                Page(current),
                Page(current + 1),
                Gap,
                Page(total),
            ]
        }
    }
}
