// ABOUTME: Configuration for the pgmi wizard
// Loads ~/.pgmi/wizard.toml (or an explicit path) with defaults for every missing key

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::components::connection_wizard::DEFAULT_PROBE_TIMEOUT;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Connectivity probe settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Terminal UI settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Log file settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Wall-clock limit for one connection test (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Spinner and cursor blink interval (default: 100ms)
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Only offer directories when tab-completing paths
    #[serde(default = "default_true")]
    pub dirs_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// EnvFilter directive used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            dirs_only: default_true(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            filter: default_filter(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT.as_secs()
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_filter() -> String {
    "pgmi_wizard=info".to_string()
}

impl WizardConfig {
    /// Load from `path`, or from the user config file when `path` is None.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// `~/.pgmi`
    pub fn home_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".pgmi"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("wizard.toml"))
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("logs"))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    /// Apply a command-line timeout on top of the file value
    pub fn with_timeout_override(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(secs) = timeout_secs {
            self.probe.timeout_secs = secs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = WizardConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert!(config.ui.dirs_only);
        assert!(config.logging.enabled);
        assert_eq!(config.logging.filter, "pgmi_wizard=info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wizard.toml");
        fs::write(&path, "[probe]\ntimeout_secs = 3\n").unwrap();

        let config = WizardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.probe.timeout_secs, 3);
        assert_eq!(config.ui, UiConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = WizardConfig::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wizard.toml");
        fs::write(&path, "[probe\n").unwrap();
        let err = WizardConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_timeout_override() {
        let config = WizardConfig::default().with_timeout_override(Some(30));
        assert_eq!(config.probe_timeout(), Duration::from_secs(30));
        let config = WizardConfig::default().with_timeout_override(None);
        assert_eq!(config.probe.timeout_secs, 10);
    }
}
