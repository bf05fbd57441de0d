//! Page-bounds correction.
//!
//! When a destructive action or a new search shrinks the result set, the
//! caller's current page can end up past the last page. The table does not
//! clamp that value itself (the caller owns it); it asks for the last valid
//! page instead.

use std::num::NonZeroU32;

use log::debug;

use super::Pagination;

/// The page to request when `pagination` points past its last page.
///
/// Only corrects downward. Pages are 1-based, so a page below the valid range
/// cannot be represented in the first place.
pub fn correction(pagination: &Pagination) -> Option<NonZeroU32> {
    let max_pages = pagination.total_pages();
    if pagination.current_page() > max_pages {
        NonZeroU32::new(max_pages)
    } else {
        None
    }
}

/// Change-triggered wrapper around [`correction`].
///
/// Evaluates only when total items, current page or page size differ from
/// the last evaluated values, so an unanswered request is not repeated on
/// every render.
#[derive(Debug, Clone, Default)]
pub struct BoundsCorrector {
    last: Option<Pagination>,
}

impl BoundsCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `pagination`, returning the page to request if one is needed.
    pub fn check(&mut self, pagination: &Pagination) -> Option<NonZeroU32> {
        if self.last.as_ref() == Some(pagination) {
            return None;
        }
        self.last = Some(*pagination);

        let page = correction(pagination)?;
        debug!(
            "Page {} out of range ({} items, {} per page), requesting page {}",
            pagination.current_page(),
            pagination.total_items(),
            pagination.items_per_page(),
            page
        );
        Some(page)
    }

    /// Forget the last evaluated values.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination(current: u32, per_page: u32, total: u64) -> Pagination {
        Pagination::new(current, per_page, total).unwrap()
    }

    #[test]
    fn test_valid_page_needs_no_correction() {
        assert_eq!(correction(&pagination(4, 15, 50)), None);
        assert_eq!(correction(&pagination(1, 15, 0)), None);
    }

    #[test]
    fn test_corrects_to_last_page() {
        assert_eq!(correction(&pagination(4, 15, 10)).map(NonZeroU32::get), Some(1));
        assert_eq!(correction(&pagination(9, 10, 35)).map(NonZeroU32::get), Some(4));
    }

    #[test]
    fn test_corrector_requests_once_per_change() {
        let mut corrector = BoundsCorrector::new();
        let p = pagination(4, 15, 10);

        assert_eq!(corrector.check(&p).map(NonZeroU32::get), Some(1));
        assert_eq!(corrector.check(&p), None);
        assert_eq!(corrector.check(&p), None);

        // The owner ignored the request but the total moved again.
        let p = p.with_total_items(20);
        assert_eq!(corrector.check(&p).map(NonZeroU32::get), Some(2));
    }

    #[test]
    fn test_reset_reevaluates() {
        let mut corrector = BoundsCorrector::new();
        let p = pagination(3, 5, 5);
        assert!(corrector.check(&p).is_some());
        corrector.reset();
        assert!(corrector.check(&p).is_some());
    }
}
