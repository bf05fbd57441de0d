//! Footer descriptors: the "showing X to Y of Z" line and the page size picker.

use std::fmt;

use super::Pagination;

/// 1-based range of items on the current page.
///
/// An empty result set reports `0 to 0 of 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSummary {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

impl RangeSummary {
    pub fn of(pagination: &Pagination) -> Self {
        let total = pagination.total_items();
        let per_page = u64::from(pagination.items_per_page());
        let first = pagination.offset().saturating_add(1);
        let last = u64::from(pagination.current_page())
            .saturating_mul(per_page)
            .min(total);

        if total == 0 || first > total {
            return Self {
                first: 0,
                last: 0,
                total,
            };
        }

        Self { first, last, total }
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} items",
            self.first, self.last, self.total
        )
    }
}

/// Items-per-page choices offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeSelector {
    pub options: Vec<u32>,
    pub selected: u32,
}

impl PageSizeSelector {
    pub fn new(options: &[u32], selected: u32) -> Self {
        Self {
            options: options.to_vec(),
            selected,
        }
    }

    /// The option after the selected one, wrapping around.
    ///
    /// If the selected size is not an offered option, the first option.
    pub fn cycle(&self) -> Option<u32> {
        let next = match self.options.iter().position(|&o| o == self.selected) {
            Some(i) => self.options.get((i + 1) % self.options.len()),
            None => self.options.first(),
        };
        next.copied()
    }
}
