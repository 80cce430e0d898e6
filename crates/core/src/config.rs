//! Application configuration.
//!
//! Values are layered: built-in defaults, then the JSON file at
//! [`config_path`], then `SLOTSCOPE__*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculators::DEFAULT_BONUS_RTP;

const APP_DIR: &str = "slotscope";
const CONFIG_FILE: &str = "config.json";
const ENV_PREFIX: &str = "SLOTSCOPE";

/// Published games dataset.
pub const DEFAULT_GAMES_URL: &str =
    "https://raw.githubusercontent.com/masterries/Casino-Analyse/main/data/gamesData.json";
/// Published pot dataset.
pub const DEFAULT_POTS_URL: &str =
    "https://raw.githubusercontent.com/masterries/Casino-Analyse/main/data/potData.json";
/// Paginated games endpoint crawled by the collector.
pub const DEFAULT_COLLECTOR_URL: &str = "https://tower.bet/api/external-casino/games";

/// Top-level configuration for the dashboard and the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote games dataset.
    pub games_url: String,
    /// Remote pot dataset.
    pub pots_url: String,
    /// Local games dataset; wins over `games_url` when set.
    pub games_file: Option<PathBuf>,
    /// Local pot dataset; wins over `pots_url` when set.
    pub pots_file: Option<PathBuf>,
    /// Directory holding saved calculations.
    pub data_dir: PathBuf,
    /// HTTP timeout for dataset downloads.
    pub request_timeout_secs: u64,
    /// Games revealed per "load more" step.
    pub page_size: usize,
    /// RTP prefilled in the bonus calculator.
    pub default_rtp: f64,
    /// Collector settings.
    pub collector: CollectorConfig,
}

/// Settings for `slotscope collect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Paginated endpoint, queried with `page` and `limit`.
    pub base_url: String,
    /// Records requested per page.
    pub page_size: usize,
    /// Pause between page requests.
    pub delay_ms: u64,
    /// Output file for the collected array.
    pub output: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            games_url: DEFAULT_GAMES_URL.to_string(),
            pots_url: DEFAULT_POTS_URL.to_string(),
            games_file: None,
            pots_file: None,
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            request_timeout_secs: 30,
            page_size: 9,
            default_rtp: DEFAULT_BONUS_RTP,
            collector: CollectorConfig::default(),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COLLECTOR_URL.to_string(),
            page_size: 30,
            delay_ms: 5000,
            output: PathBuf::from("gamesData.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration using `path` as the file layer. A missing file is skipped.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Config::try_from(&AppConfig::default())
            .context("failed to build default configuration")?;
        let settings = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }
}

/// Location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Write a default configuration file unless one already exists.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized = serde_json::to_string_pretty(&AppConfig::default())
        .context("failed to serialize default configuration")?;
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.json"))?;
        assert_eq!(config.page_size, 9);
        assert_eq!(config.default_rtp, 99.0);
        assert_eq!(config.collector.delay_ms, 5000);
        assert_eq!(config.collector.page_size, 30);
        assert!(config.games_file.is_none());
        Ok(())
    }

    #[test]
    fn file_overrides_selected_fields() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "games_file": "/tmp/games.json", "page_size": 12, "collector": { "delay_ms": 0 } }"#,
        )?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.games_file, Some(PathBuf::from("/tmp/games.json")));
        assert_eq!(config.page_size, 12);
        assert_eq!(config.collector.delay_ms, 0);
        assert_eq!(config.collector.page_size, 30);
        assert_eq!(config.pots_url, DEFAULT_POTS_URL);
        Ok(())
    }

    #[test]
    fn default_file_is_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("slotscope").join("config.json");
        write_default_config(path.clone())?;
        let written: AppConfig = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(written, AppConfig::default());

        fs::write(&path, r#"{ "page_size": 3 }"#)?;
        write_default_config(path.clone())?;
        assert_eq!(AppConfig::load_from(&path)?.page_size, 3);
        Ok(())
    }
}
