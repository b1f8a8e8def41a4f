use std::path::PathBuf;
use std::time::Duration;

/// Host-side settings.  Gameplay constants live in `coin_dodge::compute`.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub log_file: PathBuf,
    /// Used when `RUST_LOG` is unset.
    pub default_log_filter: String,
    pub frame: Duration,
    /// Longest delta handed to the simulation, in seconds.
    pub max_delta: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_file: std::env::temp_dir().join("coin_dodge.log"),
            default_log_filter: "info".to_string(),
            frame: Duration::from_millis(33), // ≈30 FPS
            max_delta: 0.25,
        }
    }
}

impl HostConfig {
    /// Defaults, with the log path taken from `COIN_DODGE_LOG` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = std::env::var_os("COIN_DODGE_LOG") {
            config.log_file = PathBuf::from(path);
        }
        config
    }
}
