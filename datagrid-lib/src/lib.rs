//! Headless tabular data browser.
//!
//! A [`DataTable`] renders caller-owned rows through a set of [`Column`]s,
//! debounces its search box, keeps the caller's page within range and builds
//! a bounded pagination strip. It fetches nothing and stores no business
//! state: the owner supplies data and pagination on every render and receives
//! [`Intent`]s back.

pub mod column;
pub mod config;
pub mod error;
pub mod intent;
pub mod pagination;
pub mod presenter;
pub mod search;
pub mod view;

mod table;

pub use column::{Column, ColumnWidth, Columns};
pub use config::TableConfig;
pub use error::{ColumnError, ConfigError, PaginationError, TableError};
pub use intent::{Intent, TableHandler};
pub use pagination::Pagination;
pub use presenter::{Body, VisualState};
pub use table::{DataTable, TableProps};
pub use view::TableView;
