//! User settings loaded from `datagrid.json`.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use datagrid_lib::{ConfigError, TableConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid table settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Everything the front-end reads from disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub table: TableConfig,
    /// Simulated catalogue round-trip time.
    pub latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table: TableConfig::default()
                .with_search_placeholder("Search spaces...")
                .with_empty_messages("No spaces listed.", "No spaces match your search.")
                .with_error_prefix("Could not load spaces")
                .with_reset_filters(true),
            latency_ms: 350,
        }
    }
}

impl Settings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.table.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/datagrid/settings.json")).unwrap();
        assert_eq!(settings.latency_ms, 350);
        assert!(settings.table.reset_filters);
    }

    #[test]
    fn test_parse_partial() {
        let settings =
            Settings::parse(r#"{"latency_ms": 0, "table": {"debounce_ms": 300}}"#).unwrap();
        assert_eq!(settings.latency(), Duration::ZERO);
        assert_eq!(settings.table.debounce, Duration::from_millis(300));
        // A nested table object starts from the library defaults
        assert!(!settings.table.reset_filters);
    }

    #[test]
    fn test_parse_rejects_invalid_table() {
        let err = Settings::parse(r#"{"table": {"page_size_options": []}}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(ConfigError::NoPageSizes)));
    }
}
