use std::{path::Path, sync::Mutex};

use anyhow::Context;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

const APP_NAME: &str = "vidshelf";

/// Installs the global tracing subscriber.
///
/// Events are written as bunyan JSON lines both to stdout and to the log file at `log_path`.
/// `RUST_LOG` takes precedence over the level selected by `debug`.
pub fn init_subscriber(debug: bool, log_path: &Path) -> anyhow::Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Creating log directory {parent:?}"))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Opening log file {log_path:?}"))?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            APP_NAME.to_string(),
            std::io::stdout,
        ))
        .with(BunyanFormattingLayer::new(
            APP_NAME.to_string(),
            Mutex::new(log_file),
        ));

    tracing::subscriber::set_global_default(subscriber)
        .context("Installing the global tracing subscriber")
}
