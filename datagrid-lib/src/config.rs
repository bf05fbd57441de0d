//! Table configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::DEFAULT_DEBOUNCE;

/// Presentation options for a [`DataTable`](crate::DataTable).
///
/// Deserializes from partial documents; missing fields keep their defaults.
///
/// ```
/// use datagrid_lib::TableConfig;
///
/// let config = TableConfig::default()
///     .with_search_placeholder("Search listings...")
///     .with_reset_filters(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub search_placeholder: String,
    pub show_search: bool,
    pub show_pagination: bool,
    pub show_items_per_page: bool,
    /// Quiet period before a search term is committed.
    #[serde(rename = "debounce_ms", with = "millis")]
    pub debounce: Duration,
    /// Shown when there are no rows and no search term.
    pub empty_message: String,
    /// Shown when a search term is committed and there are no rows.
    pub empty_search_message: String,
    /// Prepended to supplier error messages.
    pub error_prefix: String,
    pub page_size_options: Vec<u32>,
    pub default_page_size: u32,
    /// Offer a reset-filters action in the empty state.
    pub reset_filters: bool,
    /// Rows react to clicks.
    pub clickable_rows: bool,
    /// Reserve a slot for a host-provided toolbar next to the search box.
    pub custom_toolbar: bool,
    /// Height hint for the scrollable body, in rows.
    pub max_height: Option<u16>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            search_placeholder: "Search...".to_string(),
            show_search: true,
            show_pagination: true,
            show_items_per_page: true,
            debounce: DEFAULT_DEBOUNCE,
            empty_message: "No items found.".to_string(),
            empty_search_message: "No items match your search.".to_string(),
            error_prefix: "Failed to load data".to_string(),
            page_size_options: vec![5, 15, 50],
            default_page_size: 15,
            reset_filters: false,
            clickable_rows: true,
            custom_toolbar: false,
            max_height: None,
        }
    }
}

impl TableConfig {
    /// Check the options that would make a table misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce.is_zero() {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::NoPageSizes);
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::ZeroPageSize);
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(ConfigError::UnknownDefaultPageSize(self.default_page_size));
        }
        Ok(())
    }

    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_empty_messages(
        mut self,
        empty: impl Into<String>,
        empty_search: impl Into<String>,
    ) -> Self {
        self.empty_message = empty.into();
        self.empty_search_message = empty_search.into();
        self
    }

    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    pub fn with_page_sizes(mut self, options: impl Into<Vec<u32>>, default: u32) -> Self {
        self.page_size_options = options.into();
        self.default_page_size = default;
        self
    }

    pub fn with_reset_filters(mut self, enabled: bool) -> Self {
        self.reset_filters = enabled;
        self
    }

    pub fn with_clickable_rows(mut self, enabled: bool) -> Self {
        self.clickable_rows = enabled;
        self
    }

    pub fn with_custom_toolbar(mut self, enabled: bool) -> Self {
        self.custom_toolbar = enabled;
        self
    }

    pub fn with_max_height(mut self, rows: u16) -> Self {
        self.max_height = Some(rows);
        self
    }

    pub fn without_search(mut self) -> Self {
        self.show_search = false;
        self
    }

    pub fn without_pagination(mut self) -> Self {
        self.show_pagination = false;
        self
    }

    pub fn without_items_per_page(mut self) -> Self {
        self.show_items_per_page = false;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().try_into().unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
