mod app;
mod catalog;
mod paths;
mod render;
mod settings;
mod terminal;

use std::fs::File;

use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::catalog::Catalog;
use crate::settings::Settings;

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("Cannot create log file {}: {}", path.display(), e),
    }
}

fn load_settings() -> Settings {
    let Some(path) = paths::settings_file() else {
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let settings = load_settings();
    let catalog = Catalog::sample(settings.latency());
    info!("Catalogue ready with {} listings", catalog.len());

    if let Err(e) = app::run(catalog, settings.table).await {
        eprintln!("Error: {}", e);
    }
}
