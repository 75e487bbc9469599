//! Delta update command handler

use std::path::Path;

use anyhow::{Context, Result};
use respak_archive::Snapshot;
use respak_patch::diff_snapshots;

/// Generate the delta package between two versions
pub fn handle(root: &Path, old_version: u32, new_version: u32) -> Result<()> {
    let old = Snapshot::new(root, old_version);
    let new = Snapshot::new(root, new_version);

    let delta = diff_snapshots(&old, &new)
        .with_context(|| format!("generating delta update from {old_version} to {new_version}"))?;
    println!("{}", delta.display());
    Ok(())
}
