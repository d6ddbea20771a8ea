use crate::error::{PlotzError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Configuration for plotz, stored in `<data_dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlotzConfig {
    /// Start a brand new garden with the sample plants and activities
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,

    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_seed_defaults() -> bool {
    true
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for PlotzConfig {
    fn default() -> Self {
        Self {
            seed_defaults: default_seed_defaults(),
            log_level: default_log_level(),
        }
    }
}

impl PlotzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PlotzError::Io)?;
        let config: PlotzConfig =
            serde_json::from_str(&content).map_err(PlotzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PlotzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PlotzError::Serialization)?;
        fs::write(config_path, content).map_err(PlotzError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "seed-defaults" => Some(self.seed_defaults.to_string()),
            "log-level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "seed-defaults" => {
                self.seed_defaults = value
                    .parse()
                    .map_err(|_| format!("Invalid value for seed-defaults: {}", value))?;
                Ok(())
            }
            "log-level" => {
                let level = value.to_ascii_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(format!("Invalid log level: {}", value));
                }
                self.log_level = level;
                Ok(())
            }
            other => Err(format!("Unknown config key: {}", other)),
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["seed-defaults", "log-level"]
    }
}
