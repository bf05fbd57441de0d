//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "datagrid";
const APPLICATION: &str = "datagrid";

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept besides the current one.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for configuration files.
///
/// - Linux: `$XDG_CONFIG_HOME/datagrid` or `~/.config/datagrid`
/// - macOS: `~/Library/Application Support/dev.datagrid.datagrid`
/// - Windows: `C:\Users\<User>\AppData\Roaming\datagrid\datagrid\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory for logs.
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("datagrid.json"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `latest.log` under a timestamped name and prune old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let _ = fs::create_dir_all(&cache);

    let latest = cache.join(LATEST_LOG);
    if latest.exists() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{stamp}.log")));
    }

    prune_archives(&cache, MAX_OLD_LOGS);
}

/// Delete all but the `keep` most recently modified archived logs in `dir`.
/// Returns how many were deleted.
fn prune_archives(dir: &Path, keep: usize) -> usize {
    let Ok(entries) = fs::read_dir(dir) else { return 0 };

    let mut archives: Vec<(Option<SystemTime>, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .map(|path| (fs::metadata(&path).and_then(|m| m.modified()).ok(), path))
        .collect();

    // Newest first
    archives.sort_by(|a, b| b.0.cmp(&a.0));

    archives
        .iter()
        .skip(keep)
        .filter(|(_, path)| fs::remove_file(path).is_ok())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_newest_and_latest() {
        let dir = std::env::temp_dir().join(format!("datagrid-logs-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        fs::write(dir.join(LATEST_LOG), "current").unwrap();
        fs::write(dir.join("notes.txt"), "not a log").unwrap();
        for i in 0..5 {
            fs::write(dir.join(format!("2026010{i}_000000.log")), "old").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        assert_eq!(prune_archives(&dir, 2), 3);
        assert!(dir.join(LATEST_LOG).exists());
        assert!(dir.join("notes.txt").exists());
        assert!(dir.join("20260104_000000.log").exists());
        assert!(dir.join("20260103_000000.log").exists());
        assert!(!dir.join("20260102_000000.log").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
