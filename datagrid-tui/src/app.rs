//! The listing browser: owns the data and drives the table.

use std::io;
use std::num::NonZeroU32;
use std::time::Instant;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use datagrid_lib::{
    Column, Columns, DataTable, Intent, Pagination, PaginationError, TableConfig, TableError,
    TableHandler, TableProps,
};
use futures::StreamExt;
use log::{debug, info, trace, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tokio_util::sync::CancellationToken;

use crate::catalog::{Catalog, CatalogError, Listing, Page, Query};
use crate::render::{self, Overlay};
use crate::terminal::TerminalGuard;

const TITLE: &str = "datagrid · coworking spaces";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
}

impl From<PaginationError> for AppError {
    fn from(e: PaginationError) -> Self {
        AppError::Table(e.into())
    }
}

/// A finished fetch, tagged with the request it answers.
#[derive(Debug)]
pub struct Fetched {
    generation: u64,
    result: Result<Page, CatalogError>,
}

pub fn listing_columns() -> Result<Columns<Listing, String>, TableError> {
    let columns = Columns::new(vec![
        Column::text("location", "Location", |l: &Listing| l.location.clone())
            .min_width(12)
            .width(22),
        Column::text("country", "Country", |l: &Listing| l.country.clone()).width(10),
        Column::text("size", "Size", |l: &Listing| l.size.to_string()).width(8),
        Column::text("price", "Monthly price", |l: &Listing| {
            format!("$ {}", l.monthly_price)
        })
        .min_width(13),
    ])?;
    Ok(columns)
}

/// Owner of everything the table renders.
pub struct App {
    catalog: Catalog,
    table: DataTable<Listing, String>,
    pagination: Pagination,
    search: String,
    rows: Vec<Listing>,
    loading: bool,
    error: Option<CatalogError>,
    cursor: usize,
    status: Option<String>,
    /// Set by intent handlers; a fetch follows.
    stale: bool,
    generation: u64,
    fetch_cancel: Option<CancellationToken>,
    results: mpsc::UnboundedSender<Fetched>,
    quit: bool,
}

impl App {
    pub fn new(
        catalog: Catalog,
        config: TableConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Fetched>), AppError> {
        let pagination = Pagination::new(1, config.default_page_size, 0)?;
        let table = DataTable::new(listing_columns()?, config)?
            .with_row_key(|listing: &Listing| listing.id.to_string());
        let (tx, rx) = mpsc::unbounded_channel();

        let app = Self {
            catalog,
            table,
            pagination,
            search: String::new(),
            rows: Vec::new(),
            loading: false,
            error: None,
            cursor: 0,
            status: None,
            stale: false,
            generation: 0,
            fetch_cancel: None,
            results: tx,
            quit: false,
        };
        Ok((app, rx))
    }

    fn props(&self) -> TableProps<'_, Listing> {
        TableProps::new(&self.rows, self.pagination)
            .loading(self.loading)
            .error(self.error.as_ref().map(|e| e as &dyn std::error::Error))
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Request the rows for the current owner state.
    ///
    /// Any fetch still in flight is cancelled; late answers are dropped by
    /// generation.
    pub fn refresh(&mut self) {
        if let Some(token) = self.fetch_cancel.take() {
            token.cancel();
        }
        self.generation += 1;
        self.loading = true;
        self.error = None;

        let query = Query {
            search: self.search.clone(),
            page: self.pagination.current_page(),
            per_page: self.pagination.items_per_page(),
        };
        debug!("Fetch #{}: {:?}", self.generation, query);

        let token = CancellationToken::new();
        self.fetch_cancel = Some(token.clone());
        let catalog = self.catalog.clone();
        let results = self.results.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    trace!("Fetch #{} cancelled", generation);
                }
                result = catalog.fetch(&query) => {
                    let _ = results.send(Fetched { generation, result });
                }
            }
        });
    }

    pub fn apply_fetch(&mut self, fetched: Fetched) {
        if fetched.generation != self.generation {
            trace!("Dropping stale fetch #{}", fetched.generation);
            return;
        }
        self.loading = false;
        self.fetch_cancel = None;

        match fetched.result {
            Ok(page) => {
                self.rows = page.rows;
                self.pagination = self.pagination.with_total_items(page.total);
                self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", fetched.generation, e);
                self.rows.clear();
                self.error = Some(e);
            }
        }

        if let Some(intent) = self.table.sync(&self.pagination) {
            self.apply(intent);
        }
    }

    /// Act on a table intent, refetching if owner state changed.
    pub fn apply(&mut self, intent: Intent<Listing>) {
        debug!("Intent: {:?}", intent);
        intent.dispatch(self);
        if std::mem::take(&mut self.stale) {
            self.refresh();
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(intent) = self.table.tick(now) {
            self.apply(intent);
        }
    }

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        trace!("Key: {:?}", key);

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.quit = true,
                KeyCode::Char('r') => self.reset_filters(),
                KeyCode::Char('e') => self.toggle_outage(),
                _ => {}
            }
            return;
        }

        let intent = match key.code {
            KeyCode::Esc => {
                self.quit = true;
                None
            }
            KeyCode::Char(c) => {
                let mut text = self.table.search_input().to_string();
                text.push(c);
                self.table.input(text, Instant::now());
                None
            }
            KeyCode::Backspace => {
                let mut text = self.table.search_input().to_string();
                text.pop();
                self.table.input(text, Instant::now());
                None
            }
            KeyCode::Left => self.table.previous_page(&self.pagination),
            KeyCode::Right => self.table.next_page(&self.pagination),
            KeyCode::Home => self.table.first_page(&self.pagination),
            KeyCode::End => self.table.last_page(&self.pagination),
            KeyCode::Tab => self.table.cycle_page_size(&self.pagination),
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.cursor + 1 < self.rows.len() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Enter => self.table.click_row(&self.props(), self.cursor),
            KeyCode::Delete => {
                self.remove_selected();
                None
            }
            _ => None,
        };

        if let Some(intent) = intent {
            self.apply(intent);
        }
    }

    fn reset_filters(&mut self) {
        match self.table.reset_filters() {
            Some(intent) => self.apply(intent),
            None => self.status = Some("Resetting filters is disabled".to_string()),
        }
    }

    fn toggle_outage(&mut self) {
        let failing = !self.catalog.is_failing();
        self.catalog.set_failing(failing);
        info!("Simulated outage {}", if failing { "on" } else { "off" });
        self.status = Some(format!(
            "Simulated outage {}",
            if failing { "enabled" } else { "disabled" }
        ));
        self.refresh();
    }

    fn remove_selected(&mut self) {
        if self.loading || self.error.is_some() {
            return;
        }
        let Some(listing) = self.rows.get(self.cursor) else {
            return;
        };
        let (id, location) = (listing.id, listing.location.clone());
        if self.catalog.remove(id) {
            info!("Removed listing {}", id);
            self.status = Some(format!("Removed {} ({})", location, id));
            self.refresh();
        }
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    fn draw(&self, terminal: &mut TerminalGuard) -> io::Result<()> {
        let size = terminal.size()?;
        let view = self.table.view(&self.props());
        let overlay = Overlay {
            title: TITLE,
            cursor: Some(self.cursor),
            status: self.status.as_deref(),
        };
        render::draw(terminal.out(), &view, &overlay, size)
    }
}

impl TableHandler<Listing> for App {
    fn on_page_change(&mut self, page: u32) {
        let Some(page) = NonZeroU32::new(page) else {
            return;
        };
        self.pagination = self.pagination.with_page(page);
        self.cursor = 0;
        self.stale = true;
    }

    fn on_items_per_page_change(&mut self, size: u32) {
        let Some(size) = NonZeroU32::new(size) else {
            return;
        };
        self.pagination = self
            .pagination
            .with_items_per_page(size)
            .with_page(NonZeroU32::MIN);
        self.cursor = 0;
        self.stale = true;
    }

    fn on_search(&mut self, term: String) {
        info!("Searching for {:?}", term);
        self.search = term;
        self.pagination = self.pagination.with_page(NonZeroU32::MIN);
        self.cursor = 0;
        self.stale = true;
    }

    fn on_row_click(&mut self, row: Listing) {
        self.status = Some(format!(
            "{}, {} · {} · $ {}/month",
            row.location, row.country, row.size, row.monthly_price
        ));
    }

    fn on_reset_filters(&mut self) {
        info!("Filters reset");
        self.table.reset();
        self.search.clear();
        self.pagination = self.pagination.with_page(NonZeroU32::MIN);
        self.cursor = 0;
        self.status = None;
        self.stale = true;
    }
}

async fn sleep_until_optional(deadline: Option<Instant>) {
    match deadline {
        Some(d) => sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

/// Run the browser until the user quits.
pub async fn run(catalog: Catalog, config: TableConfig) -> Result<(), AppError> {
    let (mut app, mut results) = App::new(catalog, config)?;
    let mut terminal = TerminalGuard::new()?;
    let mut events = EventStream::new();

    info!("Browser started");
    app.refresh();

    while !app.quit {
        app.draw(&mut terminal)?;
        let deadline = app.table.next_deadline();

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(fetched) = results.recv() => app.apply_fetch(fetched),
            _ = sleep_until_optional(deadline) => app.tick(Instant::now()),
        }
    }

    if let Some(token) = app.fetch_cancel.take() {
        token.cancel();
    }
    info!("Browser stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app(latency: Duration) -> (App, mpsc::UnboundedReceiver<Fetched>) {
        let catalog = Catalog::sample(latency);
        let config = TableConfig::default().with_reset_filters(true);
        App::new(catalog, config).unwrap()
    }

    /// Feed fetch results back until nothing is in flight.
    async fn settle(app: &mut App, results: &mut mpsc::UnboundedReceiver<Fetched>) {
        while app.loading {
            let fetched = results.recv().await.unwrap();
            app.apply_fetch(fetched);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    // =========================================================================
    // Fetch Tests
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_initial_fetch_fills_first_page() {
        let (mut app, mut results) = app(Duration::from_millis(100));
        app.refresh();
        assert!(app.loading);

        settle(&mut app, &mut results).await;
        assert_eq!(app.rows.len(), 15);
        assert_eq!(app.pagination.total_items(), 36);
        assert_eq!(app.pagination.total_pages(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_results_are_dropped() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        app.refresh();
        app.apply_fetch(Fetched {
            generation: app.generation - 1,
            result: Err(CatalogError::Unavailable),
        });
        assert!(app.loading);
        assert!(app.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outage_shows_error_and_recovers() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
        settle(&mut app, &mut results).await;
        assert!(app.error.is_some());
        assert!(app.rows.is_empty());

        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::CONTROL));
        settle(&mut app, &mut results).await;
        assert!(app.error.is_none());
        assert_eq!(app.rows.len(), 15);
    }

    // =========================================================================
    // Intent Tests
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_navigation_keys() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        app.handle_key(key(KeyCode::Right));
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.current_page(), 2);

        app.handle_key(key(KeyCode::End));
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.current_page(), 3);
        assert_eq!(app.rows.len(), 6);

        // Disabled on the last page
        app.handle_key(key(KeyCode::Right));
        assert!(!app.loading);

        app.handle_key(key(KeyCode::Home));
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.current_page(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_cycles_page_size_and_returns_to_first_page() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;
        app.handle_key(key(KeyCode::Right));
        settle(&mut app, &mut results).await;

        app.handle_key(key(KeyCode::Tab));
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.items_per_page(), 50);
        assert_eq!(app.pagination.current_page(), 1);
        assert_eq!(app.rows.len(), 36);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_search_commits_after_debounce() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        for c in "lisboa".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.search, "");

        app.tick(Instant::now() + Duration::from_secs(1));
        assert_eq!(app.search, "lisboa");
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.total_items(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_reports_selected_row() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        let status = app.status.clone().unwrap();
        assert!(status.starts_with(&app.rows[1].location));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removing_last_page_rows_moves_back_a_page() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;
        app.handle_key(key(KeyCode::End));
        settle(&mut app, &mut results).await;
        assert_eq!(app.pagination.current_page(), 3);

        // Empty page 3 out from under the table
        for listing in app.rows.clone() {
            assert!(app.catalog.remove(listing.id));
        }
        app.refresh();
        settle(&mut app, &mut results).await;

        assert_eq!(app.pagination.total_items(), 30);
        assert_eq!(app.pagination.current_page(), 2);
        assert_eq!(app.rows.len(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_search_and_remounts() {
        let (mut app, mut results) = app(Duration::ZERO);
        app.refresh();
        settle(&mut app, &mut results).await;

        app.apply(Intent::Search("zzzzzz".into()));
        settle(&mut app, &mut results).await;
        assert!(app.rows.is_empty());

        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        settle(&mut app, &mut results).await;
        assert_eq!(app.search, "");
        assert_eq!(app.table.search_input(), "");
        assert_eq!(app.rows.len(), 15);
    }
}
