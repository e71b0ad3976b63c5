//! Gate configuration management

use anyhow::{Context, Result, anyhow};
use common::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "gate.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub gate: GateSettings,
    /// Where user records are kept
    #[serde(default)]
    pub store: StoreConfig,
    /// Tool started after a successful login
    #[serde(default)]
    pub launch: LaunchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSettings {
    #[serde(default = "GateSettings::default_log_level")]
    pub log_level: String,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

impl GateSettings {
    fn default_log_level() -> String {
        "warn".to_string()
    }
}

/// User store location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "StoreConfig::default_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl StoreConfig {
    fn default_path() -> PathBuf {
        paths::data_file("users.toml")
    }

    /// Store path with `~` expanded
    pub fn resolved_path(&self) -> PathBuf {
        paths::expand_path(&self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSettings {
    #[serde(default = "LaunchSettings::default_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            program: Self::default_program(),
            args: Vec::new(),
        }
    }
}

impl LaunchSettings {
    fn default_program() -> String {
        "usb-tracker".to_string()
    }
}

impl GateConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            let candidates = vec![
                Self::default_path(),
                paths::system_config_file(CONFIG_FILE_NAME),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: GateConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("Failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        paths::config_file(CONFIG_FILE_NAME)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        common::validate_log_level(&self.gate.log_level)?;

        if self.store.path.as_os_str().is_empty() {
            return Err(anyhow!("store.path must not be empty"));
        }
        if self.launch.program.trim().is_empty() {
            return Err(anyhow!("launch.program must not be empty"));
        }

        Ok(())
    }
}
