//! Terminal-specific configuration.
use std::env;
use std::time::Duration;

/// Settings for the terminal front-end, separate from the session runtime.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// How long a resolved move is presented before the next one may resolve.
    pub animation: Duration,
    /// Input poll and redraw cadence.
    pub frame_interval: Duration,
}

impl CliConfig {
    pub const DEFAULT_ANIMATION_MS: u64 = 120;
    pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CLI_ANIMATION_MS` - Move animation length (default: 120, 0 disables)
    /// - `CLI_FRAME_INTERVAL_MS` - Frame interval (default: 16, minimum 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(millis) = read_env::<u64>("CLI_ANIMATION_MS") {
            config.animation = Duration::from_millis(millis);
        }

        if let Some(millis) = read_env::<u64>("CLI_FRAME_INTERVAL_MS") {
            config.frame_interval = Duration::from_millis(millis.max(1));
        }

        config
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            animation: Duration::from_millis(Self::DEFAULT_ANIMATION_MS),
            frame_interval: Duration::from_millis(Self::DEFAULT_FRAME_INTERVAL_MS),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
