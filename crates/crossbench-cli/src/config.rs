//! CLI configuration: harness settings plus logging, layered file → env → flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use crossbench_common::HarnessConfig;
use serde::{Deserialize, Serialize};

pub const ENV_LOG_LEVEL: &str = "CROSSBENCH_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CROSSBENCH_LOG_FORMAT";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Top-level configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub harness: HarnessConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string(), timestamps: true }
    }
}

impl CliConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, text).with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// `<config dir>/crossbench/config.toml`.
    pub fn default_config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine the user configuration directory")?;
        Ok(dir.join("crossbench").join("config.toml"))
    }

    /// Overlay `CROSSBENCH_*` environment variables.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.harness.apply_env().context("Invalid harness environment override")?;
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Ok(format) = env::var(ENV_LOG_FORMAT) {
            self.logging.format = format;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.harness.validate().context("Invalid harness configuration")?;
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            bail!("Invalid log level: {}. Must be one of: {}", self.logging.level, LOG_LEVELS.join(", "));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            bail!("Invalid log format: {}. Must be one of: {}", self.logging.format, LOG_FORMATS.join(", "));
        }
        Ok(())
    }
}

/// Builds the effective configuration: file, then environment, then the
/// global `--log-level` flag. Per-command flags such as `run --rounds` are
/// applied by the command itself.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: CliConfig,
    log_level: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { config: CliConfig::load_from_file(path)?, ..Self::default() })
    }

    pub fn log_level(mut self, level: Option<String>) -> Self {
        if level.is_some() {
            self.log_level = level;
        }
        self
    }

    pub fn build(self) -> Result<CliConfig> {
        let mut config = self.config;
        config.merge_with_env()?;
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        config.validate()?;
        Ok(config)
    }
}
