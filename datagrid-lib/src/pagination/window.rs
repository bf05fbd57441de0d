//! Bounded pagination widget synthesis.
//!
//! However many pages exist, the window shows page 1, at most three pages
//! around the current one, the last page, and ellipsis markers for the gaps.

/// Which gap an ellipsis stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EllipsisPosition {
    /// Between page 1 and the middle pages.
    Start,
    /// Between the middle pages and the last page.
    End,
}

/// One entry of the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis(EllipsisPosition),
}

impl PageItem {
    /// The page number, if this is a page link.
    pub fn page(&self) -> Option<u32> {
        match self {
            PageItem::Page { number, .. } => Some(*number),
            PageItem::Ellipsis(_) => None,
        }
    }
}

/// A previous/next link.
///
/// The target is always a valid page, even when the link is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub target: u32,
    pub enabled: bool,
}

/// The computed pagination strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub items: Vec<PageItem>,
    /// `None` when there is a single page.
    pub previous: Option<NavLink>,
    /// `None` when there is a single page.
    pub next: Option<NavLink>,
}

impl PageWindow {
    /// Page numbers in display order, ellipses skipped.
    pub fn pages(&self) -> Vec<u32> {
        self.items.iter().filter_map(PageItem::page).collect()
    }
}

/// Compute the pagination strip for `current` out of `total_pages`.
///
/// `total_pages` below 1 is treated as 1 and `current` is clamped into
/// `[1, total_pages]`, so a page that is out of range (while a correction is
/// pending) still yields a well-formed strip.
pub fn page_window(current: u32, total_pages: u32) -> PageWindow {
    let total = total_pages.max(1);
    let current = current.clamp(1, total);

    let mut items = Vec::with_capacity(7);
    items.push(PageItem::Page {
        number: 1,
        active: current == 1,
    });

    if total == 1 {
        return PageWindow {
            items,
            previous: None,
            next: None,
        };
    }

    let start = current.saturating_sub(1).max(2);
    let end = current.saturating_add(1).min(total - 1);

    if start > 2 {
        items.push(PageItem::Ellipsis(EllipsisPosition::Start));
    }

    for number in start..=end {
        items.push(PageItem::Page {
            number,
            active: current == number,
        });
    }

    if end < total - 1 {
        items.push(PageItem::Ellipsis(EllipsisPosition::End));
    }

    items.push(PageItem::Page {
        number: total,
        active: current == total,
    });

    PageWindow {
        items,
        previous: Some(NavLink {
            target: current.saturating_sub(1).max(1),
            enabled: current > 1,
        }),
        next: Some(NavLink {
            target: current.saturating_add(1).min(total),
            enabled: current < total,
        }),
    }
}
