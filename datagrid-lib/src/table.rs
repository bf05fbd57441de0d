//! The data table controller.
//!
//! [`DataTable`] is a view over data it does not own. The owner passes the
//! current rows, pagination and loading/error flags in as [`TableProps`] and
//! gets back a [`TableView`] to draw plus [`Intent`]s to act on. The only
//! state the table keeps is the search box text, its debounce deadline and
//! the memory of the bounds corrector.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};

use crate::column::Columns;
use crate::config::TableConfig;
use crate::error::TableError;
use crate::intent::Intent;
use crate::pagination::{
    BoundsCorrector, PageSizeSelector, Pagination, RangeSummary, page_window,
};
use crate::presenter::{Body, BodyInput, Presenter, RowKeyFn};
use crate::search::Debouncer;
use crate::view::{Footer, HeaderCell, SearchField, TableView, Toolbar};

/// Everything the owner supplies for one render.
pub struct TableProps<'a, T> {
    pub data: &'a [T],
    pub pagination: Pagination,
    pub is_loading: bool,
    pub error: Option<&'a (dyn std::error::Error + 'a)>,
}

impl<T> Clone for TableProps<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TableProps<'_, T> {}

impl<'a, T> TableProps<'a, T> {
    pub fn new(data: &'a [T], pagination: Pagination) -> Self {
        Self {
            data,
            pagination,
            is_loading: false,
            error: None,
        }
    }

    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn error(mut self, error: Option<&'a (dyn std::error::Error + 'a)>) -> Self {
        self.error = error;
        self
    }
}

/// A generic, headless tabular data browser.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use datagrid_lib::{Column, Columns, DataTable, Intent, Pagination, TableConfig, TableProps};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Space {
///     city: &'static str,
///     price: u32,
/// }
///
/// let columns = Columns::new(vec![
///     Column::text("city", "City", |s: &Space| s.city.to_string()),
///     Column::text("price", "Price", |s: &Space| s.price.to_string()),
/// ])
/// .unwrap();
/// let mut table: DataTable<Space, String> =
///     DataTable::new(columns, TableConfig::default()).unwrap();
///
/// let rows = [
///     Space { city: "Recife", price: 1200 },
///     Space { city: "Natal", price: 900 },
/// ];
/// let pagination = Pagination::new(1, 15, 2).unwrap();
/// let view = table.view(&TableProps::new(&rows, pagination));
/// assert_eq!(view.header.len(), 2);
///
/// let t0 = Instant::now();
/// table.input("rec", t0);
/// let intent = table.tick(t0 + Duration::from_millis(800));
/// assert_eq!(intent, Some(Intent::Search("rec".into())));
/// ```
pub struct DataTable<T, C> {
    columns: Columns<T, C>,
    config: TableConfig,
    row_key: Option<RowKeyFn<T>>,
    search: Debouncer,
    bounds: BoundsCorrector,
}

impl<T, C> DataTable<T, C> {
    /// Create a table. Fails if `config` does not validate.
    pub fn new(columns: Columns<T, C>, config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            search: Debouncer::new(config.debounce),
            columns,
            config,
            row_key: None,
            bounds: BoundsCorrector::new(),
        })
    }

    /// Give rendered rows a stable identity.
    pub fn with_row_key<F>(mut self, key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.row_key = Some(Arc::new(key));
        self
    }

    pub fn columns(&self) -> &Columns<T, C> {
        &self.columns
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The search box text as typed.
    pub fn search_input(&self) -> &str {
        self.search.raw()
    }

    /// The last search term sent to the owner.
    pub fn committed_search(&self) -> &str {
        self.search.committed()
    }

    // -------------------------------------------------------------------------
    // Owner-driven updates
    // -------------------------------------------------------------------------

    /// Reconcile with the owner's pagination after it changed.
    ///
    /// Requests the last page when the current one is out of range. The
    /// request is made once per distinct pagination value.
    pub fn sync(&mut self, pagination: &Pagination) -> Option<Intent<T>> {
        self.bounds
            .check(pagination)
            .map(|page| Intent::PageChange(page.get()))
    }

    /// Remount: clear the search box and any pending commit.
    pub fn reset(&mut self) {
        debug!("Table reset");
        self.search.reset();
        self.bounds.reset();
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// The search box changed to `text`.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.search.input(text, now);
    }

    /// When [`tick`](Self::tick) next needs to run, if at all.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    /// Advance the debounce clock. Emits at most one search intent.
    pub fn tick(&mut self, now: Instant) -> Option<Intent<T>> {
        self.search.poll(now).map(Intent::Search)
    }

    // -------------------------------------------------------------------------
    // Pagination gestures
    // -------------------------------------------------------------------------

    /// Request `page`, clamped into range. Requests for the current page are
    /// dropped.
    pub fn go_to_page(&self, pagination: &Pagination, page: u32) -> Option<Intent<T>> {
        let page = page.clamp(1, pagination.total_pages());
        if page == pagination.current_page() {
            trace!("Page {} already shown", page);
            return None;
        }
        debug!("Requesting page {}", page);
        Some(Intent::PageChange(page))
    }

    /// Follow the "previous" link. Disabled on the first page.
    pub fn previous_page(&self, pagination: &Pagination) -> Option<Intent<T>> {
        let link = page_window(pagination.current_page(), pagination.total_pages()).previous?;
        if !link.enabled {
            return None;
        }
        self.go_to_page(pagination, link.target)
    }

    /// Follow the "next" link. Disabled on the last page.
    pub fn next_page(&self, pagination: &Pagination) -> Option<Intent<T>> {
        let link = page_window(pagination.current_page(), pagination.total_pages()).next?;
        if !link.enabled {
            return None;
        }
        self.go_to_page(pagination, link.target)
    }

    pub fn first_page(&self, pagination: &Pagination) -> Option<Intent<T>> {
        self.go_to_page(pagination, 1)
    }

    pub fn last_page(&self, pagination: &Pagination) -> Option<Intent<T>> {
        self.go_to_page(pagination, pagination.total_pages())
    }

    /// Request a page size. Only configured options that differ from the
    /// current size produce an intent.
    pub fn select_page_size(&self, pagination: &Pagination, size: u32) -> Option<Intent<T>> {
        if size == pagination.items_per_page() || !self.config.page_size_options.contains(&size) {
            return None;
        }
        debug!("Requesting {} items per page", size);
        Some(Intent::ItemsPerPageChange(size))
    }

    /// Request the next configured page size, wrapping around.
    pub fn cycle_page_size(&self, pagination: &Pagination) -> Option<Intent<T>> {
        let size = self.page_size_selector(pagination).cycle()?;
        self.select_page_size(pagination, size)
    }

    // -------------------------------------------------------------------------
    // Row and column gestures
    // -------------------------------------------------------------------------

    /// A click on the rendered row at `index`.
    ///
    /// Yields the original row from `props.data`, and only when that row is
    /// actually on screen.
    pub fn click_row(&self, props: &TableProps<'_, T>, index: usize) -> Option<Intent<T>>
    where
        T: Clone,
    {
        if !self.config.clickable_rows || props.error.is_some() || props.is_loading {
            return None;
        }
        let row = props.data.get(index)?;
        debug!("Row {} clicked", index);
        Some(Intent::RowClick(row.clone()))
    }

    /// The reset-filters action of the empty state.
    pub fn reset_filters(&self) -> Option<Intent<T>> {
        self.config.reset_filters.then_some(Intent::ResetFilters)
    }

    /// Ask the owner to move column `id` to position `to`.
    pub fn move_column(&self, id: &str, to: usize) -> Option<Intent<T>> {
        let from = self.columns.position(id)?;
        let to = to.min(self.columns.len() - 1);
        (from != to).then_some(Intent::ColumnReorder { from, to })
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Render the table for the given props.
    pub fn view(&self, props: &TableProps<'_, T>) -> TableView<C> {
        let presenter = Presenter {
            columns: &self.columns,
            config: &self.config,
            row_key: self.row_key.as_ref(),
        };
        let body = presenter.body(&BodyInput {
            data: props.data,
            is_loading: props.is_loading,
            error: props.error,
            searching: !self.search.committed().is_empty(),
            items_per_page: props.pagination.items_per_page(),
        });

        TableView {
            toolbar: self.toolbar(),
            header: self
                .columns
                .iter()
                .map(|column| HeaderCell {
                    column_id: column.id().to_string(),
                    width: column.width_hint(),
                    content: column.render_header(),
                })
                .collect(),
            footer: self.footer(props, &body),
            body,
            max_height: self.config.max_height,
        }
    }

    fn toolbar(&self) -> Option<Toolbar> {
        if !self.config.show_search && !self.config.custom_toolbar {
            return None;
        }
        Some(Toolbar {
            search: self.config.show_search.then(|| SearchField {
                placeholder: self.config.search_placeholder.clone(),
                value: self.search.raw().to_string(),
            }),
            custom: self.config.custom_toolbar,
        })
    }

    fn footer(&self, props: &TableProps<'_, T>, body: &Body<C>) -> Option<Footer> {
        if matches!(body, Body::Loading { .. } | Body::Failed { .. }) {
            return None;
        }
        let pagination = &props.pagination;
        let total_pages = pagination.total_pages();

        Some(Footer {
            pagination: (self.config.show_pagination && total_pages > 1)
                .then(|| page_window(pagination.current_page(), total_pages)),
            summary: RangeSummary::of(pagination),
            page_size: self
                .config
                .show_items_per_page
                .then(|| self.page_size_selector(pagination)),
        })
    }

    fn page_size_selector(&self, pagination: &Pagination) -> PageSizeSelector {
        PageSizeSelector::new(
            &self.config.page_size_options,
            pagination.items_per_page(),
        )
    }
}

impl<T, C> std::fmt::Debug for DataTable<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("search", &self.search)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}
