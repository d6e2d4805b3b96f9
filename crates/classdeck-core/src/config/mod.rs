//! Configuration types for Classdeck.
//!
//! Configuration is loaded from a single YAML file (`classdeck.yaml`). Every
//! field has a default, so an empty file is a valid configuration.
//!
//! # Configuration Files
//!
//! - **classdeck.yaml**: dashboard listener, pagination, toast and logging settings
//! - **data file** (optional): a YAML catalog replacing the built-in seed data,
//!   referenced by `data_file` and resolved relative to the config file

pub mod dashboard;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::Catalog;

pub use dashboard::DashboardConfig;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "classdeck.yaml";

/// Complete Classdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassdeckConfig {
    /// Platform name shown in the header.
    #[serde(default = "default_project")]
    pub project: String,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Toast notification settings.
    #[serde(default)]
    pub toasts: ToastConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Optional catalog file replacing the built-in seed data.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

impl Default for ClassdeckConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            dashboard: DashboardConfig::default(),
            toasts: ToastConfig::default(),
            logging: LoggingConfig::default(),
            data_file: None,
        }
    }
}

/// Toast notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToastConfig {
    /// Seconds a toast stays visible unless dismissed.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl ToastConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_project() -> String {
    "Classdeck".to_string()
}

fn default_ttl_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClassdeckConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }

    /// Load configuration and resolve `data_file` against the config
    /// file's directory.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(data_file) = &config.data_file
            && !data_file.is_absolute()
        {
            config.data_file = Some(base_dir.join(data_file));
        }

        Ok(config)
    }

    /// Load the catalog named by `data_file`, or the built-in seed data.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.data_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading catalog from data file");
                Catalog::from_file(path)
            }
            None => Ok(Catalog::seed()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.items_per_page == 0 {
            return Err(ConfigError::Config(
                "dashboard.items_per_page must be greater than zero".to_string(),
            ));
        }
        if self.toasts.ttl_secs == 0 {
            return Err(ConfigError::Config(
                "toasts.ttl_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ClassdeckConfig::from_yaml("").unwrap();
        assert_eq!(config, ClassdeckConfig::default());
        assert_eq!(config.dashboard.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.dashboard.items_per_page, 10);
        assert_eq!(config.toasts.ttl(), Duration::from_secs(5));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ClassdeckConfig::from_yaml(
            r#"
project: Academy
dashboard:
  port: 9000
toasts:
  ttl_secs: 8
"#,
        )
        .unwrap();
        assert_eq!(config.project, "Academy");
        assert_eq!(config.dashboard.port, 9000);
        assert_eq!(config.dashboard.host, "127.0.0.1");
        assert_eq!(config.toasts.ttl_secs, 8);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = ClassdeckConfig::from_yaml("dashboard:\n  items_per_page: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn yaml_round_trip_preserves_settings() {
        let mut config = ClassdeckConfig::default();
        config.dashboard.port = 3000;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(ClassdeckConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn data_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("classdeck.yaml");
        let mut file = fs::File::create(&config_path).unwrap();
        writeln!(file, "data_file: data/catalog.yaml").unwrap();

        let config = ClassdeckConfig::load_with_context(&config_path).unwrap();
        assert_eq!(
            config.data_file,
            Some(dir.path().join("data/catalog.yaml"))
        );
    }

    #[test]
    fn catalog_falls_back_to_seed_data() {
        let catalog = ClassdeckConfig::default().catalog().unwrap();
        assert_eq!(catalog.courses.len(), Catalog::seed().courses.len());
    }
}
