//! Loader configuration: validated at construction, loadable from TOML.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Delay before a load resolves when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Payload a load resolves with when none is configured.
pub const DEFAULT_PAYLOAD: &str = "Data loaded";

/// Problems constructing or reading a [`LoaderConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A zero delay would let a load resolve on the spot, which the loader
    /// never does.
    #[error("delay must be non-zero")]
    ZeroDelay,
    /// The payload would be empty after trimming.
    #[error("payload must not be empty")]
    EmptyPayload,
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Validated loader configuration.
///
/// An invalid combination is unrepresentable once built: the delay is always
/// non-zero and the payload is always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    delay: Duration,
    payload: String,
}

impl LoaderConfig {
    pub fn new(delay: Duration, payload: impl Into<String>) -> Result<Self, ConfigError> {
        if delay.is_zero() {
            return Err(ConfigError::ZeroDelay);
        }
        let payload = payload.into();
        if payload.trim().is_empty() {
            return Err(ConfigError::EmptyPayload);
        }
        Ok(Self { delay, payload })
    }

    /// Read configuration from a TOML file.
    ///
    /// A missing file is not an error; it yields the defaults, so the demo
    /// runs out of the box. Anything else (unreadable file, malformed TOML,
    /// invalid values) is reported as a typed error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let file: ConfigFile = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::try_from(file)?;
        tracing::debug!(path = %path.display(), delay = ?config.delay, "config loaded");
        Ok(config)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            payload: DEFAULT_PAYLOAD.to_string(),
        }
    }
}

/// On-disk shape of the config file. Both keys are optional; omitted keys
/// fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    delay_ms: Option<u64>,
    payload: Option<String>,
}

impl TryFrom<ConfigFile> for LoaderConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let delay = file.delay_ms.map_or(DEFAULT_DELAY, Duration::from_millis);
        let payload = file.payload.unwrap_or_else(|| DEFAULT_PAYLOAD.to_string());
        Self::new(delay, payload)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn default_config_matches_reference_behavior() {
        let config = LoaderConfig::default();
        assert_eq!(config.delay(), Duration::from_millis(1000));
        assert_eq!(config.payload(), "Data loaded");
    }

    #[test]
    fn rejects_zero_delay() {
        let result = LoaderConfig::new(Duration::ZERO, "Data loaded");
        assert!(matches!(result, Err(ConfigError::ZeroDelay)));
    }

    #[test]
    fn rejects_empty_payload() {
        let result = LoaderConfig::new(Duration::from_millis(5), "   ");
        assert!(matches!(result, Err(ConfigError::EmptyPayload)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("temp dir");
        let config = LoaderConfig::load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn file_overrides_delay_and_payload() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ersatz.toml");
        fs::write(&path, "delay_ms = 250\npayload = \"cached\"\n").expect("write config");

        let config = LoaderConfig::load(&path).expect("config");
        assert_eq!(config.delay(), Duration::from_millis(250));
        assert_eq!(config.payload(), "cached");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ersatz.toml");
        fs::write(&path, "delay_ms = 10\n").expect("write config");

        let config = LoaderConfig::load(&path).expect("config");
        assert_eq!(config.delay(), Duration::from_millis(10));
        assert_eq!(config.payload(), DEFAULT_PAYLOAD);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ersatz.toml");
        fs::write(&path, "delay_ms = \"soon\"\n").expect("write config");

        let result = LoaderConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ersatz.toml");
        fs::write(&path, "delay_millis = 10\n").expect("write config");

        let result = LoaderConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn zero_delay_in_file_is_rejected() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("ersatz.toml");
        fs::write(&path, "delay_ms = 0\n").expect("write config");

        let result = LoaderConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ZeroDelay)));
    }
}
