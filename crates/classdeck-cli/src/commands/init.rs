//! `classdeck init` - write a default configuration file.

use anyhow::{Context, Result, bail};
use classdeck_core::ClassdeckConfig;
use std::fs;
use std::path::Path;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() {
        if !force {
            bail!(
                "{} already exists (use --force to overwrite)",
                path.display()
            );
        }
        println!("⚠️  Overwriting {}", path.display());
    }

    let yaml = ClassdeckConfig::default().to_yaml()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, yaml).with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote default configuration");
    println!("   ✓ {}", path.display());
    Ok(())
}
