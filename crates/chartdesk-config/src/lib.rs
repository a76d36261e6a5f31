//! Configuration management for chartdesk.
//!
//! Loads configuration from TOML files with sensible defaults for every
//! section, so a missing file or a partial file both work.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub chart: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./config.toml`
    /// 2. `~/.config/chartdesk/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load("config.toml") {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("chartdesk").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default instrument to load on startup.
    pub default_symbol: String,
    /// Default chart timeframe label.
    pub default_timeframe: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_symbol: "XAUUSD".to_string(),
            default_timeframe: "M5".to_string(),
        }
    }
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the dashboard backend.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 10,
            user_agent: "chartdesk/0.1".to_string(),
        }
    }
}

/// Chart surface and data-window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Surface height in pixels.
    pub height: u32,
    /// Surface width in pixels.
    pub width: u32,
    /// How many candles of the active timeframe a fetch should cover.
    pub target_candles: usize,
    /// Maximum number of entry signals overlaid at once.
    pub signal_overlay_limit: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            height: 500,
            width: 1280,
            target_candles: 200,
            signal_overlay_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.default_symbol, "XAUUSD");
        assert_eq!(config.general.default_timeframe, "M5");
        assert_eq!(config.chart.target_candles, 200);
        assert_eq!(config.chart.signal_overlay_limit, 5);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[general]
default_symbol = "EURUSD"
default_timeframe = "H1"

[api]
base_url = "https://api.example.com"

[chart]
height = 600
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.general.default_symbol, "EURUSD");
        assert_eq!(config.general.default_timeframe, "H1");
        assert_eq!(config.api.base_url, "https://api.example.com");
        // Unset fields fall back to defaults
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.chart.height, 600);
        assert_eq!(config.chart.width, 1280);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
    }
}
