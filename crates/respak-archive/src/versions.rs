//! Version directory management
//!
//! Snapshots live in integer-named directories under one resource root.
//! A "full" version still has all of its base archives on disk; once newer
//! full versions exist, intermediate ones only need their delta packages.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ArchiveError, Result};
use crate::rewrite::{ReplaceMode, rewrite_archive};
use crate::snapshot::{ARCHIVE_NAMES, PACKAGE_ARCHIVE, Snapshot, VERSION_MANIFEST};

/// One entry of the `version.json` manifest
///
/// The manifest content is a single-element list: `[{"version": <int>}]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Snapshot version number
    pub version: u32,
}

/// List all versions under `root`, ascending
///
/// A version is any directory with an integer name.
pub fn list_versions(root: &Path) -> Result<Vec<u32>> {
    let mut versions = Vec::new();
    for dir_entry in fs::read_dir(root)? {
        let dir_entry = dir_entry?;
        if !dir_entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(version) = dir_entry
            .file_name()
            .to_str()
            .and_then(|name| name.parse::<u32>().ok())
        {
            versions.push(version);
        }
    }
    versions.sort_unstable();
    Ok(versions)
}

/// List versions whose base archives are all still on disk, ascending
pub fn list_full_versions(root: &Path) -> Result<Vec<u32>> {
    Ok(list_versions(root)?
        .into_iter()
        .filter(|&version| is_full_version(root, version))
        .collect())
}

fn is_full_version(root: &Path, version: u32) -> bool {
    let snapshot = Snapshot::new(root, version);
    ARCHIVE_NAMES
        .iter()
        .all(|name| snapshot.archive_path(name).is_file())
}

/// Create the directory for a new version from the previous one
///
/// Copies every base archive of `old_version` into a fresh `new_version`
/// directory and rewrites the version manifest inside the package archive.
pub fn create_version(root: &Path, old_version: u32, new_version: u32) -> Result<Snapshot> {
    let old = Snapshot::new(root, old_version);
    let new = Snapshot::new(root, new_version);

    let new_dir = new.dir();
    if new_dir.exists() {
        return Err(ArchiveError::VersionExists(new_dir));
    }
    fs::create_dir_all(&new_dir)?;

    for name in ARCHIVE_NAMES {
        let src = old.archive_path(name);
        if !src.is_file() {
            return Err(ArchiveError::MissingArchive(src));
        }
        fs::copy(&src, new.archive_path(name))?;
    }

    let manifest = serde_json::to_vec(&[VersionRecord {
        version: new_version,
    }])?;
    let mut replacements = BTreeMap::new();
    replacements.insert(VERSION_MANIFEST.to_owned(), manifest);
    rewrite_archive(
        &new.archive_path(PACKAGE_ARCHIVE),
        &replacements,
        ReplaceMode::ExistingOnly,
    )?;

    info!("Created version {new_version} from {old_version}");
    Ok(new)
}

/// Read the version number recorded in a snapshot's manifest
pub fn read_version_manifest(snapshot: &Snapshot) -> Result<u32> {
    let content = snapshot
        .read_member(VERSION_MANIFEST, &[PACKAGE_ARCHIVE])?
        .ok_or_else(|| ArchiveError::MissingMember {
            archive: snapshot.archive_path(PACKAGE_ARCHIVE),
            name: VERSION_MANIFEST.to_owned(),
        })?;
    let records: Vec<VersionRecord> = serde_json::from_slice(&content)?;
    records
        .first()
        .map(|record| record.version)
        .ok_or_else(|| {
            ArchiveError::Manifest(<serde_json::Error as serde::de::Error>::custom(
                "empty version list",
            ))
        })
}

/// Delete base archives of every full version except the earliest and latest
///
/// Delta packages are kept for all versions; only the base archives of
/// intermediate full versions are removed. Returns the pruned versions.
pub fn prune_full_versions(root: &Path) -> Result<Vec<u32>> {
    let full = list_full_versions(root)?;
    if full.len() <= 2 {
        debug!("Two or fewer full versions, nothing to prune");
        return Ok(Vec::new());
    }

    let pruned = full[1..full.len() - 1].to_vec();
    info!("Deleting base archives for versions {pruned:?}");
    for &version in &pruned {
        let snapshot = Snapshot::new(root, version);
        for name in ARCHIVE_NAMES {
            let path = snapshot.archive_path(name);
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
    }
    Ok(pruned)
}
