//! tile1024 terminal client.
//!
//! Composition root: reads configuration, installs logging, opens the
//! snapshot store and the telemetry sink, then hands a [`Session`] to the
//! terminal event loop.
//!
//! ```bash
//! TILE_SEED=seed-beta-221022 ENABLE_PERSISTENCE=true cargo run -p tile-client
//! ```
mod app;
mod config;
mod format;
mod input;
mod logging;
mod presentation;

use std::sync::Arc;

use anyhow::Result;
use tile_runtime::{
    FileSnapshotRepository, JsonLinesSink, RuntimeConfig, Session, SnapshotRepository,
    TelemetryQueue,
};

use crate::app::{App, now_millis};
use crate::config::CliConfig;
use crate::presentation::terminal::{self, TerminalGuard};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let runtime_config = RuntimeConfig::from_env();
    let cli_config = CliConfig::from_env();

    let log_label = runtime_config
        .session_id
        .clone()
        .unwrap_or_else(|| format!("session_{}", now_millis() / 1_000));
    let _log_guard = logging::setup_logging(&log_label)?;

    tracing::info!("Starting tile1024");
    tracing::info!("Seed: {}", runtime_config.seed);
    tracing::info!("Persistence: {}", runtime_config.enable_persistence);

    let save_dir = runtime_config.resolved_save_dir();
    let repository: Option<Arc<dyn SnapshotRepository>> = if runtime_config.enable_persistence {
        tracing::info!("Save directory: {}", save_dir.display());
        Some(Arc::new(FileSnapshotRepository::new(&save_dir)?))
    } else {
        None
    };

    let session = Session::bootstrap(&runtime_config, repository, now_millis())?;

    let telemetry_path = runtime_config
        .telemetry
        .log_path
        .clone()
        .unwrap_or_else(|| save_dir.join("telemetry.jsonl"));
    tracing::info!("Telemetry log: {}", telemetry_path.display());
    let telemetry = TelemetryQueue::new(
        Arc::new(JsonLinesSink::new(telemetry_path)),
        &runtime_config.telemetry,
    );

    let _terminal_guard = TerminalGuard;
    let mut terminal = terminal::init()?;

    App::new(session, telemetry, cli_config)
        .run(&mut terminal)
        .await?;

    tracing::info!("Client shutdown complete");
    Ok(())
}
