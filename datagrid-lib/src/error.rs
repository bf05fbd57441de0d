//! Error types
//!
//! Everything here is a contract violation caught while building a table.
//! Runtime failures of the data supplier are not errors of this crate; they
//! are rendered through [`Body::Failed`](crate::presenter::Body::Failed).

use thiserror::Error;

/// Invalid column configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    #[error("a table needs at least one column")]
    Empty,
    #[error("duplicate column id: {0}")]
    DuplicateId(String),
    #[error("column {id}: {reason}")]
    InvalidWidth { id: String, reason: &'static str },
}

/// Invalid pagination values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("pages are numbered from 1")]
    ZeroPage,
    #[error("items per page must be positive")]
    ZeroPageSize,
}

/// Invalid table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("debounce time must be positive")]
    ZeroDebounce,
    #[error("at least one page size option is required")]
    NoPageSizes,
    #[error("page size options must be positive")]
    ZeroPageSize,
    #[error("default page size {0} is not one of the page size options")]
    UnknownDefaultPageSize(u32),
}

/// Any error raised while assembling a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("column error: {0}")]
    Column(#[from] ColumnError),
    #[error("pagination error: {0}")]
    Pagination(#[from] PaginationError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
