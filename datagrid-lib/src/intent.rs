//! Outbound requests.
//!
//! The table never mutates pagination, search or row data. Every user
//! gesture becomes at most one [`Intent`] for the owning layer to act on.

/// A request from the table to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<T> {
    /// Show this page.
    PageChange(u32),
    /// Use this page size.
    ItemsPerPageChange(u32),
    /// The committed search term changed.
    Search(String),
    /// A row was clicked. Carries the original row value.
    RowClick(T),
    /// The reset-filters action in the empty state was used.
    ResetFilters,
    /// Move the column at `from` to position `to`.
    ColumnReorder { from: usize, to: usize },
}

impl<T> Intent<T> {
    /// Route this intent to the matching handler method.
    pub fn dispatch<H: TableHandler<T> + ?Sized>(self, handler: &mut H) {
        match self {
            Intent::PageChange(page) => handler.on_page_change(page),
            Intent::ItemsPerPageChange(size) => handler.on_items_per_page_change(size),
            Intent::Search(term) => handler.on_search(term),
            Intent::RowClick(row) => handler.on_row_click(row),
            Intent::ResetFilters => handler.on_reset_filters(),
            Intent::ColumnReorder { from, to } => handler.on_column_reorder(from, to),
        }
    }
}

/// Callback-style receiver for intents.
///
/// Every method defaults to doing nothing, so an owner implements only the
/// interactions it supports.
pub trait TableHandler<T> {
    fn on_page_change(&mut self, _page: u32) {}

    fn on_items_per_page_change(&mut self, _size: u32) {}

    fn on_search(&mut self, _term: String) {}

    fn on_row_click(&mut self, _row: T) {}

    fn on_reset_filters(&mut self) {}

    fn on_column_reorder(&mut self, _from: usize, _to: usize) {}
}
