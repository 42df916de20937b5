//! Configuration loading and management
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/trajectory-viewer/config.toml`
//! (`~/.config/trajectory-viewer/config.toml`). A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::filters::sort::{SortDirection, SortSpec};

/// Default cap on the size of a trajectory file: 50MB
pub const DEFAULT_MAX_FILE_BYTES: u64 = 50 * 1024 * 1024;

/// Returns XDG_CONFIG_HOME or the platform config directory
fn xdg_config_home() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .unwrap_or_else(|| PathBuf::from(".config"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Record list settings
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// How JSONL records are ordered and summarised
#[derive(Debug, Deserialize, Clone)]
pub struct ViewerConfig {
    /// Dotted path (or `duration`, `len(...)`) used as the sort key
    #[serde(default = "default_sort_field")]
    pub sort_field: String,

    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Paths shown next to each record in listings
    #[serde(default)]
    pub display_fields: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            sort_field: default_sort_field(),
            sort_direction: SortDirection::default(),
            display_fields: Vec::new(),
        }
    }
}

impl ViewerConfig {
    /// Sort order described by this config
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_field.clone(), self.sort_direction)
    }
}

fn default_sort_field() -> String {
    "instance_id".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Largest trajectory or patch file that will be read
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_file_bytes: default_max_file_bytes() }
    }
}

fn default_max_file_bytes() -> u64 {
    DEFAULT_MAX_FILE_BYTES
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::debug!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every load fail
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_bytes == 0 {
            return Err(Error::Config("limits.max_file_bytes must be greater than 0".to_string()));
        }
        if self.viewer.sort_field.trim().is_empty() {
            return Err(Error::Config("viewer.sort_field cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/trajectory-viewer/config.toml`
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("trajectory-viewer").join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.viewer.sort_field, "instance_id");
        assert_eq!(config.viewer.sort_direction, SortDirection::Asc);
        assert!(config.viewer.display_fields.is_empty());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[viewer]
sort_field = "duration"
sort_direction = "desc"
display_fields = ["instance_id", "len(history)"]

[logging]
level = "debug"

[limits]
max_file_bytes = 1024
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.viewer.sort_field, "duration");
        assert_eq!(config.viewer.sort_direction, SortDirection::Desc);
        assert_eq!(config.viewer.display_fields, vec!["instance_id", "len(history)"]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.limits.max_file_bytes, 1024);

        let spec = config.viewer.sort_spec();
        assert_eq!(spec.field, "duration");
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[logging]\nlevel = \"info\"\n").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.viewer.sort_field, "instance_id");
    }

    #[test]
    fn test_load_from_rejects_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[viewer\nsort_field = 3").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn test_load_from_rejects_zero_limit() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[limits]\nmax_file_bytes = 0\n").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_file_bytes"));
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = Config::config_path();
        assert!(path.ends_with("trajectory-viewer/config.toml"));
    }
}
