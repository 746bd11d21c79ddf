mod api;
mod app;
mod config;
mod models;
mod tasks;
mod tui;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from(Cli::load());
    init_tracing(&config)?;

    let (msg_tx, msg_rx) = tokio::sync::mpsc::unbounded_channel();

    let controller = tui::AppController::new(&config, msg_tx)?;
    let app = tui::App::new(controller, msg_rx).with_dish(config.initial_dish());

    tracing::info!(model = config.model(), "starting recipe-scout");
    tui::run(app).await
}

/// The terminal belongs to the UI, so diagnostics go to a file.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_file())
        .with_context(|| format!("Failed to open log file {}", config.log_file().display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("recipe_scout=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
