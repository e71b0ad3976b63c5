//! Tracker configuration management

use anyhow::{Context, Result, anyhow};
use common::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name inside the config directories
const CONFIG_FILE_NAME: &str = "tracker.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub tracker: TrackerSettings,
    /// Kernel log source
    #[serde(default)]
    pub source: SourceSettings,
    /// Device inventory commands and filters
    #[serde(default)]
    pub inventory: InventorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    #[serde(default = "TrackerSettings::default_log_level")]
    pub log_level: String,
    /// Directory event logs are written into (and browsed by the analyzer)
    #[serde(default = "TrackerSettings::default_output_dir")]
    pub output_dir: PathBuf,
    /// Base name offered when the user leaves the name prompt blank
    #[serde(default = "TrackerSettings::default_log_name")]
    pub default_log_name: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            output_dir: Self::default_output_dir(),
            default_log_name: Self::default_log_name(),
        }
    }
}

impl TrackerSettings {
    fn default_log_level() -> String {
        "warn".to_string()
    }

    fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }

    fn default_log_name() -> String {
        events::DEFAULT_LOG_NAME.to_string()
    }
}

/// Where kernel log text comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Program printing the kernel log
    #[serde(default = "SourceSettings::default_command")]
    pub command: String,
    /// Arguments passed to `command`
    #[serde(default = "SourceSettings::default_args")]
    pub args: Vec<String>,
    /// Bus path whose events are extracted (e.g. "1-1")
    #[serde(default = "SourceSettings::default_bus_path")]
    pub bus_path: String,
    /// Read this kernel log file instead of running `command`
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            command: Self::default_command(),
            args: Self::default_args(),
            bus_path: Self::default_bus_path(),
            file: None,
        }
    }
}

impl SourceSettings {
    fn default_command() -> String {
        "journalctl".to_string()
    }

    fn default_args() -> Vec<String> {
        vec!["-k".to_string(), "--no-pager".to_string()]
    }

    fn default_bus_path() -> String {
        "1-1".to_string()
    }
}

/// Device inventory commands and line filters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default = "InventorySettings::default_lsusb")]
    pub lsusb_command: String,
    #[serde(default = "InventorySettings::default_lsblk")]
    pub lsblk_command: String,
    /// A device line must contain one of these to be listed
    #[serde(default = "InventorySettings::default_storage_markers")]
    pub storage_markers: Vec<String>,
    /// Device lines containing any of these are never listed
    #[serde(default = "InventorySettings::default_exclude_markers")]
    pub exclude_markers: Vec<String>,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            lsusb_command: Self::default_lsusb(),
            lsblk_command: Self::default_lsblk(),
            storage_markers: Self::default_storage_markers(),
            exclude_markers: Self::default_exclude_markers(),
        }
    }
}

impl InventorySettings {
    fn default_lsusb() -> String {
        "lsusb".to_string()
    }

    fn default_lsblk() -> String {
        "lsblk".to_string()
    }

    fn default_storage_markers() -> Vec<String> {
        vec!["Mass Storage".to_string(), "Flash Drive".to_string()]
    }

    fn default_exclude_markers() -> Vec<String> {
        vec!["root hub".to_string(), "VirtualBox".to_string()]
    }
}

impl TrackerConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            // Try standard locations in order
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

        let config: TrackerConfig = toml::from_str(&content)
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

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        paths::config_file(CONFIG_FILE_NAME)
    }

    /// Output directory with `~` expanded
    pub fn output_dir(&self) -> PathBuf {
        paths::expand_path(&self.tracker.output_dir)
    }

    /// Kernel log file with `~` expanded, if one is configured
    pub fn source_file(&self) -> Option<PathBuf> {
        self.source.file.as_deref().map(paths::expand_path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        common::validate_log_level(&self.tracker.log_level)?;

        let name = self.tracker.default_log_name.trim();
        if name.is_empty() {
            return Err(anyhow!("default_log_name must not be blank"));
        }
        if name.contains(['/', '\\']) {
            return Err(anyhow!(
                "Invalid default_log_name '{}', must be a plain file name",
                name
            ));
        }

        Self::validate_bus_path(&self.source.bus_path)?;

        if self.source.command.trim().is_empty() {
            return Err(anyhow!("source.command must not be empty"));
        }
        if self.inventory.lsusb_command.trim().is_empty()
            || self.inventory.lsblk_command.trim().is_empty()
        {
            return Err(anyhow!("inventory commands must not be empty"));
        }

        Ok(())
    }

    /// Validate a bus path (`<digits>-<digits>`)
    fn validate_bus_path(bus_path: &str) -> Result<()> {
        let valid = bus_path
            .split_once('-')
            .map(|(bus, port)| {
                !bus.is_empty()
                    && !port.is_empty()
                    && bus.chars().all(|c| c.is_ascii_digit())
                    && port.chars().all(|c| c.is_ascii_digit())
            })
            .unwrap_or(false);

        if valid {
            Ok(())
        } else {
            Err(anyhow!(
                "Invalid bus_path '{}', expected <bus>-<port> (e.g., '1-1')",
                bus_path
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.tracker.log_level, "warn");
        assert_eq!(config.tracker.default_log_name, "usb_logs");
        assert_eq!(config.source.command, "journalctl");
        assert_eq!(config.source.bus_path, "1-1");
        assert!(config.source.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bus_path() {
        assert!(TrackerConfig::validate_bus_path("1-1").is_ok());
        assert!(TrackerConfig::validate_bus_path("12-4").is_ok());
        assert!(TrackerConfig::validate_bus_path("1").is_err());
        assert!(TrackerConfig::validate_bus_path("1-").is_err());
        assert!(TrackerConfig::validate_bus_path("a-1").is_err());
        assert!(TrackerConfig::validate_bus_path("1-1.2").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = TrackerConfig::default();
        config.tracker.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.tracker.log_level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_default_log_name() {
        let mut config = TrackerConfig::default();
        config.tracker.default_log_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.tracker.default_log_name = "../escape".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = TrackerConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: TrackerConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.tracker.log_level, parsed.tracker.log_level);
        assert_eq!(config.source.args, parsed.source.args);
        assert_eq!(
            config.inventory.storage_markers,
            parsed.inventory.storage_markers
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: TrackerConfig = toml::from_str(
            r#"
[source]
bus_path = "2-1"
"#,
        )
        .unwrap();
        assert_eq!(parsed.source.bus_path, "2-1");
        assert_eq!(parsed.source.command, "journalctl");
        assert_eq!(parsed.tracker.log_level, "warn");
    }

    #[test]
    fn test_documented_config_file() {
        let config: TrackerConfig =
            toml::from_str(include_str!("../tests/fixtures/tracker.toml")).unwrap();
        config.validate().unwrap();

        assert_eq!(config.tracker.log_level, "debug");
        assert_eq!(config.tracker.default_log_name, "session");
        assert_eq!(config.source.bus_path, "2-1");
        assert_eq!(config.source.args.len(), 4);
        assert_eq!(config.source_file(), Some(PathBuf::from("/var/log/kern.log")));
        assert_eq!(config.inventory.lsblk_command, "/usr/bin/lsblk");
        assert_eq!(config.inventory.storage_markers.len(), 3);
        assert_eq!(config.inventory.exclude_markers, vec!["root hub".to_string()]);
    }

    #[test]
    fn test_default_config_uses_documented_keys() {
        let value: toml::Value = toml::from_str(&toml::to_string(&TrackerConfig::default()).unwrap())
            .unwrap();

        for (section, keys) in [
            ("tracker", &["log_level", "output_dir", "default_log_name"][..]),
            ("source", &["command", "args", "bus_path"][..]),
            (
                "inventory",
                &["lsusb_command", "lsblk_command", "storage_markers", "exclude_markers"][..],
            ),
        ] {
            let table = value.get(section).unwrap();
            for key in keys {
                assert!(table.get(key).is_some(), "missing {}.{}", section, key);
            }
        }
        // Unset optional file is omitted
        assert!(value["source"].get("file").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tracker.toml");

        let mut config = TrackerConfig::default();
        config.tracker.output_dir = PathBuf::from("/var/tmp/usb");
        config.save(&path).unwrap();

        let loaded = TrackerConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.tracker.output_dir, PathBuf::from("/var/tmp/usb"));
    }
}
