//! Configuration system for banter.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BanterError, BanterResult};

/// Main bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Display name used in replies.
    pub bot_name: String,
    /// Workbook (table collection) the ask tables are loaded from.
    pub workbook: String,
    /// Directory holding workbook data.
    pub data_dir: PathBuf,
    /// Path to the preference snapshot file.
    pub prefs_path: PathBuf,
    /// Minimum seconds between forced cache refreshes.
    pub refresh_cooldown_secs: u64,
    /// Seconds between token claims.
    pub claim_cooldown_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        let banter_dir = dirs::home_dir()
            .map(|h| h.join(".banter"))
            .unwrap_or_else(|| PathBuf::from(".banter"));

        Self {
            bot_name: "Banter".to_string(),
            workbook: "banter-data".to_string(),
            data_dir: banter_dir.join("data"),
            prefs_path: banter_dir.join("prefs.json"),
            refresh_cooldown_secs: 120,
            claim_cooldown_secs: 3600,
        }
    }
}

impl BotConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BanterResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| BanterError::configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| BanterError::configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| BanterError::configuration(e.to_string())),
            _ => Err(BanterError::configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml",
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("BANTER_BOT_NAME") {
            config.bot_name = name;
        }
        if let Ok(workbook) = std::env::var("BANTER_WORKBOOK") {
            config.workbook = workbook;
        }
        if let Ok(dir) = std::env::var("BANTER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("BANTER_PREFS_PATH") {
            config.prefs_path = PathBuf::from(path);
        }
        if let Ok(secs) = std::env::var("BANTER_REFRESH_COOLDOWN_SECS") {
            if let Ok(secs) = secs.parse() {
                config.refresh_cooldown_secs = secs;
            }
        }
        if let Ok(secs) = std::env::var("BANTER_CLAIM_COOLDOWN_SECS") {
            if let Ok(secs) = secs.parse() {
                config.claim_cooldown_secs = secs;
            }
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for BotConfig.
#[derive(Default)]
pub struct BotConfigBuilder {
    config: BotConfig,
}

impl BotConfigBuilder {
    /// Set the bot display name.
    pub fn bot_name(mut self, name: impl Into<String>) -> Self {
        self.config.bot_name = name.into();
        self
    }

    /// Set the workbook name.
    pub fn workbook(mut self, workbook: impl Into<String>) -> Self {
        self.config.workbook = workbook.into();
        self
    }

    /// Set the workbook data directory.
    pub fn data_dir(mut self, path: PathBuf) -> Self {
        self.config.data_dir = path;
        self
    }

    /// Set the preference snapshot path.
    pub fn prefs_path(mut self, path: PathBuf) -> Self {
        self.config.prefs_path = path;
        self
    }

    /// Set the refresh cooldown in seconds.
    pub fn refresh_cooldown_secs(mut self, secs: u64) -> Self {
        self.config.refresh_cooldown_secs = secs;
        self
    }

    /// Set the token claim cooldown in seconds.
    pub fn claim_cooldown_secs(mut self, secs: u64) -> Self {
        self.config.claim_cooldown_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BotConfig {
        self.config
    }
}
