//! Pagination state and the pure rules derived from it.
//!
//! The table never owns a [`Pagination`]; the caller hands one in on every
//! render and receives page-change requests back as intents.

mod bounds;
mod summary;
mod window;

pub use bounds::{BoundsCorrector, correction};
pub use summary::{PageSizeSelector, RangeSummary};
pub use window::{EllipsisPosition, NavLink, PageItem, PageWindow, page_window};

use std::num::NonZeroU32;

use crate::error::PaginationError;

/// Caller-owned pagination values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    current_page: NonZeroU32,
    items_per_page: NonZeroU32,
    total_items: u64,
}

impl Pagination {
    /// Create pagination state. Pages are 1-based.
    pub fn new(
        current_page: u32,
        items_per_page: u32,
        total_items: u64,
    ) -> Result<Self, PaginationError> {
        Ok(Self {
            current_page: NonZeroU32::new(current_page).ok_or(PaginationError::ZeroPage)?,
            items_per_page: NonZeroU32::new(items_per_page)
                .ok_or(PaginationError::ZeroPageSize)?,
            total_items,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.get()
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page.get()
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Number of pages, never less than one.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items, self.items_per_page)
    }

    /// Zero-based offset of the first item on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page.get() - 1) * u64::from(self.items_per_page.get())
    }

    /// Same size and total, different page.
    pub fn with_page(self, page: NonZeroU32) -> Self {
        Self {
            current_page: page,
            ..self
        }
    }

    /// Same page and size, different total.
    pub fn with_total_items(self, total_items: u64) -> Self {
        Self {
            total_items,
            ..self
        }
    }

    /// Same page and total, different size.
    pub fn with_items_per_page(self, items_per_page: NonZeroU32) -> Self {
        Self {
            items_per_page,
            ..self
        }
    }
}

/// `max(1, ceil(total_items / items_per_page))`, saturating at `u32::MAX`.
pub fn total_pages(total_items: u64, items_per_page: NonZeroU32) -> u32 {
    let pages = total_items.div_ceil(u64::from(items_per_page.get())).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_page(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, per_page(15)), 1);
        assert_eq!(total_pages(1, per_page(15)), 1);
        assert_eq!(total_pages(15, per_page(15)), 1);
        assert_eq!(total_pages(16, per_page(15)), 2);
        assert_eq!(total_pages(50, per_page(15)), 4);
        assert_eq!(total_pages(u64::MAX, per_page(1)), u32::MAX);
    }

    #[test]
    fn test_total_pages_matches_formula() {
        for total in 0..200u64 {
            for size in 1..20u32 {
                let expected = ((total as f64) / (size as f64)).ceil().max(1.0) as u32;
                assert_eq!(total_pages(total, per_page(size)), expected, "{total}/{size}");
            }
        }
    }

    #[test]
    fn test_rejects_zero_values() {
        assert_eq!(Pagination::new(0, 15, 10), Err(PaginationError::ZeroPage));
        assert_eq!(Pagination::new(1, 0, 10), Err(PaginationError::ZeroPageSize));
    }

    #[test]
    fn test_offset() {
        let p = Pagination::new(3, 15, 100).unwrap();
        assert_eq!(p.offset(), 30);
        assert_eq!(p.with_page(per_page(1)).offset(), 0);
    }
}
