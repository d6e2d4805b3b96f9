//! `classdeck check` command implementation.
//!
//! Loads the configuration and its catalog, then checks:
//! - every role declares the same permission shape
//! - lessons point at courses, tasks at lessons, reviews at tasks and students
//! - record ids are unique per kind

use anyhow::{Context, Result, bail};
use classdeck_core::{CatalogIssue, ClassdeckConfig};

/// Catalog problems found for `config`.
pub fn run_quiet(config: &ClassdeckConfig) -> Result<Vec<CatalogIssue>> {
    let catalog = config.catalog().context("failed to load catalog")?;
    Ok(catalog.validate())
}

pub fn run(config: &ClassdeckConfig) -> Result<()> {
    println!("🔍 Checking Classdeck configuration...");
    let issues = run_quiet(config)?;

    println!();
    println!("{}", "═".repeat(60));
    if issues.is_empty() {
        println!("✅ All checks passed!");
        return Ok(());
    }

    println!("❌ Errors ({}):", issues.len());
    println!("{}", "─".repeat(60));
    for issue in &issues {
        println!("  • {issue}");
    }
    bail!("catalog has {} problem(s)", issues.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use classdeck_core::Catalog;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn seed_catalog_is_clean() {
        assert!(run_quiet(&ClassdeckConfig::default()).unwrap().is_empty());
        assert!(run(&ClassdeckConfig::default()).is_ok());
    }

    #[test]
    fn dangling_lesson_fails_the_check() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("catalog.yaml");
        let mut catalog = Catalog::seed();
        catalog.lessons[0].course_id = "404".to_string();
        fs::write(&data, catalog.to_yaml().unwrap()).unwrap();

        let config = ClassdeckConfig {
            data_file: Some(data),
            ..ClassdeckConfig::default()
        };
        let issues = run_quiet(&config).unwrap();
        assert!(issues.iter().any(|i| matches!(i, CatalogIssue::UnknownCourse { .. })));
        assert!(run(&config).is_err());
    }
}
