//! Body state selection and row rendering.
//!
//! The body is recomputed from scratch on every render. Nothing here latches:
//! the same inputs always produce the same body.

use std::sync::Arc;

use crate::column::{ColumnWidth, Columns};
use crate::config::TableConfig;

pub(crate) type RowKeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Upper bound on placeholder rows, whatever the page size.
pub const MAX_SKELETON_ROWS: usize = 100;

/// Which of the three data states the table is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Loading,
    Empty,
    Populated,
}

impl VisualState {
    /// Loading wins over everything; otherwise empty or populated by row count.
    pub fn of(is_loading: bool, row_count: usize) -> Self {
        if is_loading {
            VisualState::Loading
        } else if row_count == 0 {
            VisualState::Empty
        } else {
            VisualState::Populated
        }
    }
}

/// Placeholder cell shown while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonCell {
    pub column_id: String,
    pub width: ColumnWidth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonRow {
    pub cells: Vec<SkeletonCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCell<C> {
    pub column_id: String,
    pub width: ColumnWidth,
    pub content: C,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow<C> {
    /// Index into the supplied data slice.
    pub index: usize,
    /// Stable identity from the row-key hook, if one is set.
    pub key: Option<String>,
    pub cells: Vec<RenderedCell<C>>,
    pub clickable: bool,
}

/// What the table body shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body<C> {
    /// The supplier reported an error. Suppresses every other state.
    Failed { message: String },
    Loading { rows: Vec<SkeletonRow> },
    Empty {
        message: String,
        /// Number of columns the message spans.
        span: usize,
        reset_action: bool,
    },
    Populated { rows: Vec<RenderedRow<C>> },
}

impl<C> Body<C> {
    /// The data state shown, or `None` for the error body.
    pub fn state(&self) -> Option<VisualState> {
        match self {
            Body::Failed { .. } => None,
            Body::Loading { .. } => Some(VisualState::Loading),
            Body::Empty { .. } => Some(VisualState::Empty),
            Body::Populated { .. } => Some(VisualState::Populated),
        }
    }
}

/// Inputs for one body render.
pub(crate) struct BodyInput<'a, T> {
    pub data: &'a [T],
    pub is_loading: bool,
    pub error: Option<&'a (dyn std::error::Error + 'a)>,
    pub searching: bool,
    pub items_per_page: u32,
}

pub(crate) struct Presenter<'a, T, C> {
    pub columns: &'a Columns<T, C>,
    pub config: &'a TableConfig,
    pub row_key: Option<&'a RowKeyFn<T>>,
}

impl<T, C> Presenter<'_, T, C> {
    pub fn body(&self, input: &BodyInput<'_, T>) -> Body<C> {
        if let Some(error) = input.error {
            return Body::Failed {
                message: format!("{}: {}", self.config.error_prefix, error),
            };
        }

        match VisualState::of(input.is_loading, input.data.len()) {
            VisualState::Loading => Body::Loading {
                rows: self.skeleton_rows(self.skeleton_count(input.items_per_page)),
            },
            VisualState::Empty => Body::Empty {
                message: if input.searching {
                    self.config.empty_search_message.clone()
                } else {
                    self.config.empty_message.clone()
                },
                span: self.columns.len(),
                reset_action: self.config.reset_filters,
            },
            VisualState::Populated => Body::Populated {
                rows: input
                    .data
                    .iter()
                    .enumerate()
                    .map(|(index, row)| self.render_row(index, row))
                    .collect(),
            },
        }
    }

    /// One placeholder per page slot, limited by the visible height.
    fn skeleton_count(&self, items_per_page: u32) -> usize {
        let mut count = usize::try_from(items_per_page).unwrap_or(usize::MAX);
        if let Some(max_height) = self.config.max_height {
            count = count.min(usize::from(max_height));
        }
        count.min(MAX_SKELETON_ROWS)
    }

    fn skeleton_rows(&self, count: usize) -> Vec<SkeletonRow> {
        let row = SkeletonRow {
            cells: self
                .columns
                .iter()
                .map(|column| SkeletonCell {
                    column_id: column.id().to_string(),
                    width: column.width_hint(),
                })
                .collect(),
        };
        vec![row; count]
    }

    fn render_row(&self, index: usize, row: &T) -> RenderedRow<C> {
        RenderedRow {
            index,
            key: self.row_key.map(|key| key(row)),
            cells: self
                .columns
                .iter()
                .map(|column| RenderedCell {
                    column_id: column.id().to_string(),
                    width: column.width_hint(),
                    content: column.render_cell(row),
                })
                .collect(),
            clickable: self.config.clickable_rows,
        }
    }
}
