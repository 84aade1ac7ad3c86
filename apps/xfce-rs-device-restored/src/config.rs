use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use xfce_rs_device_restore::{DeviceKind, StateDir};

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Error types for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration format: {reason}")]
    InvalidFormat { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Defaults chosen by the user. These take precedence over saved state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManualDefaults {
    pub sink: Option<String>,
    pub source: Option<String>,
}

impl ManualDefaults {
    pub fn get(&self, kind: DeviceKind) -> Option<&str> {
        match kind {
            DeviceKind::Sink => self.sink.as_deref(),
            DeviceKind::Source => self.source.as_deref(),
        }
    }
}

/// Contents of `device-restore.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Overrides the per-user state directory
    pub state_dir: Option<PathBuf>,
    /// How often the server defaults are checked for changes
    pub poll_interval_ms: u64,
    pub manual: ManualDefaults,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            state_dir: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            manual: ManualDefaults::default(),
        }
    }
}

impl DaemonConfig {
    /// `~/.config/xfce-rs/device-restore.toml`, if there is a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xfce-rs").join("device-restore.toml"))
    }

    /// Load from `path`, or from [`DaemonConfig::default_path`] when not given.
    /// Without either, the defaults are used.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load(&path),
            None => {
                debug!("No user config directory, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&content)?;
        config.validate()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::InvalidFormat {
                reason: format!(
                    "poll_interval_ms must be at least {}, got {}",
                    MIN_POLL_INTERVAL_MS, self.poll_interval_ms
                ),
            });
        }

        for kind in DeviceKind::ALL {
            if matches!(self.manual.get(kind), Some(name) if name.trim().is_empty()) {
                return Err(ConfigError::InvalidFormat {
                    reason: format!("manual.{} must not be empty", kind),
                });
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn state_paths(&self) -> StateDir {
        match &self.state_dir {
            Some(dir) => StateDir::new(dir),
            None => StateDir::user_default(),
        }
    }
}
