//! Dashboard configuration.
//!
//! Values are resolved in three layers: built-in defaults, an optional TOML
//! file, then command-line overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gauge::GaugeTiming;
use crate::models::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_ENDPOINT, DEFAULT_FEED_INTERVAL_MS,
    DEFAULT_GAUGE_DEFER_MS, DEFAULT_GAUGE_DURATION_MS, DEFAULT_RESPONSE_TIMEOUT_SECS,
    DEFAULT_SETTLE_DELAY_MS,
};
use crate::session::SessionTiming;

/// File name looked up under the user config directory.
const CONFIG_FILE: &str = "config.toml";

/// Upper bounds accepted for the timing knobs.
const MAX_SETTLE_DELAY_MS: u64 = 10 * 60 * 1_000;
const MAX_RESPONSE_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the prediction service.
    pub endpoint: String,
    /// Minimum time an analysis stays in Processing.
    pub settle_delay_ms: u64,
    /// Response deadline in seconds; 0 waits forever.
    pub response_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub feed_interval_ms: u64,
    pub gauge_defer_ms: u64,
    pub gauge_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            feed_interval_ms: DEFAULT_FEED_INTERVAL_MS,
            gauge_defer_ms: DEFAULT_GAUGE_DEFER_MS,
            gauge_duration_ms: DEFAULT_GAUGE_DURATION_MS,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub settle_delay_ms: Option<u64>,
    pub response_timeout_secs: Option<u64>,
}

impl Config {
    /// Default location: `<config dir>/riskdash/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("riskdash").join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(endpoint) = &overrides.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(settle) = overrides.settle_delay_ms {
            self.settle_delay_ms = settle;
        }
        if let Some(timeout) = overrides.response_timeout_secs {
            self.response_timeout_secs = timeout;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.settle_delay_ms > MAX_SETTLE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "settle_delay_ms must be at most {MAX_SETTLE_DELAY_MS}, got {}",
                self.settle_delay_ms
            )));
        }
        if self.response_timeout_secs > MAX_RESPONSE_TIMEOUT_SECS {
            return Err(ConfigError::Invalid(format!(
                "response_timeout_secs must be at most {MAX_RESPONSE_TIMEOUT_SECS}, got {}",
                self.response_timeout_secs
            )));
        }
        if self.feed_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "feed_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        (self.response_timeout_secs > 0).then(|| Duration::from_secs(self.response_timeout_secs))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }

    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            response_timeout: self.response_timeout(),
        }
    }

    pub fn gauge_timing(&self) -> GaugeTiming {
        GaugeTiming {
            defer: Duration::from_millis(self.gauge_defer_ms),
            duration: Duration::from_millis(self.gauge_duration_ms),
        }
    }
}
