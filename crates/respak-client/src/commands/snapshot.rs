//! Version directory command handlers

use std::path::Path;

use anyhow::{Context, Result};
use respak_archive::{create_version, prune_full_versions};

/// Create a new version directory from the previous one
pub fn handle_new_version(root: &Path, old_version: u32, new_version: u32) -> Result<()> {
    create_version(root, old_version, new_version)
        .with_context(|| format!("creating version {new_version} from {old_version}"))?;
    Ok(())
}

/// Delete base archives of superseded full versions
pub fn handle_prune(root: &Path) -> Result<()> {
    let pruned = prune_full_versions(root)
        .with_context(|| format!("pruning full versions under {}", root.display()))?;
    if pruned.is_empty() {
        println!("nothing to prune");
    } else {
        for version in pruned {
            println!("pruned {version}");
        }
    }
    Ok(())
}
