mod anim;
mod app;
mod config;
mod dice;
mod error;
mod input;
mod model;
mod render;
mod rules;
mod sim;
mod storage;
mod store;
mod timers;

use anyhow::{Context, Result};
use std::{fs::OpenOptions, path::Path, sync::Mutex};

fn main() -> Result<()> {
    let paths = config::project_paths()?;
    let loaded = config::load_settings(&paths.settings_path);
    let filter = match &loaded {
        Ok(settings) => settings.log_filter.clone(),
        Err(_) => config::Settings::default().log_filter,
    };
    init_logging(&paths.log_path, &filter)?;
    let settings = loaded.unwrap_or_else(|err| {
        tracing::warn!(error = %format!("{err:#}"), "ignoring bad settings");
        config::Settings::default()
    });
    tracing::info!(save = %paths.save_path.display(), "starting");
    app::run(paths, settings)
}

/// Logs go to a file; the terminal belongs to the game. RUST_LOG wins over
/// the default filter.
fn init_logging(log_path: &Path, default_filter: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("could not open log file {}", log_path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}
