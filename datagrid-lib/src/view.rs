//! The rendered table, as plain data.
//!
//! A [`TableView`] is what the table hands to whatever actually draws it.
//! It carries structure, text and width hints; styling belongs to the
//! renderer.

use crate::column::ColumnWidth;
use crate::pagination::{PageSizeSelector, PageWindow, RangeSummary};
use crate::presenter::Body;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchField {
    pub placeholder: String,
    /// Raw text as typed, not the committed term.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolbar {
    pub search: Option<SearchField>,
    /// The host asked for a slot to place its own controls in.
    pub custom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell<C> {
    pub column_id: String,
    pub width: ColumnWidth,
    pub content: C,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// Present when there is more than one page and pagination is shown.
    pub pagination: Option<PageWindow>,
    pub summary: RangeSummary,
    pub page_size: Option<PageSizeSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView<C> {
    pub toolbar: Option<Toolbar>,
    pub header: Vec<HeaderCell<C>>,
    pub body: Body<C>,
    /// Hidden while loading.
    pub footer: Option<Footer>,
    pub max_height: Option<u16>,
}
