//! Runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tile_core::GameConfig;

/// Seed used when no seed is configured.
pub const DEFAULT_SEED: &str = "seed-alpha-221022";

/// Configuration required to bootstrap a session.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub seed: String,
    /// Fixed session identifier; generated per session when unset.
    pub session_id: Option<String>,
    pub enable_persistence: bool,
    /// Directory for the snapshot slot; platform data directory when unset.
    pub save_data_dir: Option<PathBuf>,
    pub telemetry: TelemetryConfig,
    /// Reported as `platform.userAgent` in telemetry.
    pub user_agent: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: DEFAULT_SEED.to_string(),
            session_id: None,
            enable_persistence: false,
            save_data_dir: None,
            telemetry: TelemetryConfig::default(),
            user_agent: format!("tile1024/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TILE_SEED` - Seed for new sessions (default: `seed-alpha-221022`)
    /// - `TILE_BOARD_SIZE` - Board edge length (default: 4, minimum 2)
    /// - `TILE_UNDO_LIMIT` - Undo snapshots retained (default: 1)
    /// - `GAME_SESSION_ID` - Session identifier (default: generated)
    /// - `ENABLE_PERSISTENCE` - Persist the session snapshot (default: false)
    /// - `SAVE_DATA_DIR` - Directory for save data (default: platform-specific)
    /// - `TELEMETRY_BATCH_SIZE` - Payloads per delivered batch (default: 25)
    /// - `TELEMETRY_FLUSH_INTERVAL_MS` - Periodic flush interval (default: 4000)
    /// - `TELEMETRY_LOG` - JSON-lines file receiving telemetry batches
    /// - `TILE_USER_AGENT` - Platform string reported in telemetry
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(seed) = env::var("TILE_SEED") {
            let seed = seed.trim();
            if !seed.is_empty() {
                config.seed = seed.to_string();
            }
        }

        if let Some(size) = read_env::<usize>("TILE_BOARD_SIZE") {
            config.game = GameConfig::with_board_size(size).undo_limit(config.game.undo_limit);
        }

        if let Some(limit) = read_env::<usize>("TILE_UNDO_LIMIT") {
            config.game.undo_limit = limit;
        }

        config.session_id = env::var("GAME_SESSION_ID")
            .ok()
            .filter(|id| !id.trim().is_empty());

        // A bare `ENABLE_PERSISTENCE=` counts as enabled.
        if let Some(enable) = read_env::<bool>("ENABLE_PERSISTENCE") {
            config.enable_persistence = enable;
        } else if env::var("ENABLE_PERSISTENCE").is_ok() {
            config.enable_persistence = true;
        }

        config.save_data_dir = env::var("SAVE_DATA_DIR").ok().map(PathBuf::from);

        if let Some(size) = read_env::<usize>("TELEMETRY_BATCH_SIZE") {
            config.telemetry.max_batch_size = size.max(1);
        }

        if let Some(millis) = read_env::<u64>("TELEMETRY_FLUSH_INTERVAL_MS") {
            config.telemetry.flush_interval = Duration::from_millis(millis);
        }

        config.telemetry.log_path = env::var("TELEMETRY_LOG").ok().map(PathBuf::from);

        if let Ok(agent) = env::var("TILE_USER_AGENT") {
            config.user_agent = agent;
        }

        config
    }

    /// Directory holding the snapshot slot.
    ///
    /// Falls back to the platform data directory, then to `./save_data`.
    pub fn resolved_save_dir(&self) -> PathBuf {
        self.save_data_dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from("save_data"))
    }
}

/// Batching parameters for the telemetry queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub max_batch_size: usize,
    /// Zero disables the periodic flush task.
    pub flush_interval: Duration,
    pub log_path: Option<PathBuf>,
}

impl TelemetryConfig {
    pub const DEFAULT_BATCH_SIZE: usize = 25;
    pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(4_000);
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Self::DEFAULT_BATCH_SIZE,
            flush_interval: Self::DEFAULT_FLUSH_INTERVAL,
            log_path: None,
        }
    }
}

/// Platform-specific data directory for the game.
pub fn default_data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tile1024").map(|dirs| dirs.data_dir().to_path_buf())
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
