//! CLI command implementations for Classdeck.

pub mod check;
pub mod init;
pub mod serve;

use anyhow::{Context, Result};
use classdeck_core::{ClassdeckConfig, DEFAULT_CONFIG_FILE};
use std::path::Path;

/// Load the configuration at `path`.
///
/// A missing file is only tolerated at the default location, where it means
/// "use defaults".
pub fn load_config(path: &Path) -> Result<ClassdeckConfig> {
    if path == Path::new(DEFAULT_CONFIG_FILE) && !path.exists() {
        return Ok(ClassdeckConfig::default());
    }
    ClassdeckConfig::load_with_context(path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(&dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn data_file_resolves_next_to_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("classdeck.yaml");
        fs::write(&path, "project: Academy\ndata_file: catalog.yaml\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.project, "Academy");
        assert_eq!(config.data_file, Some(dir.path().join("catalog.yaml")));
    }
}
