//! Delta update generation
//!
//! Compares two full snapshots by content hash and emits a single patch
//! archive: created directories, full replacement content for every
//! modified-or-created file, and zero-length tombstones for deleted paths.
//! The client's patch-apply routine overwrites files in place and cannot
//! drop directory entries from already-downloaded storage, so a tombstone
//! zeroes the file instead of removing it.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, info};
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use respak_archive::{ARCHIVE_NAMES, MemberMeta, Snapshot, open_archive, write_archive_atomic};

use crate::error::{PatchError, Result};

/// Per-file record of one snapshot's authoritative state
#[derive(Debug, Clone, Copy)]
struct FileRecord {
    meta: MemberMeta,
    hash: [u8; 32],
}

/// Union of all members across one snapshot's canonical archives
///
/// Built in canonical order with later archives overwriting earlier ones,
/// the same shadowing rule the member reader applies. This mirrors the
/// state a fresh client install ends up with.
#[derive(Debug, Default)]
struct SnapshotIndex {
    dirs: BTreeMap<String, MemberMeta>,
    files: BTreeMap<String, FileRecord>,
}

fn index_snapshot(snapshot: &Snapshot) -> Result<SnapshotIndex> {
    let mut index = SnapshotIndex::default();
    for archive_name in ARCHIVE_NAMES {
        let mut archive = open_archive(&snapshot.archive_path(archive_name))?;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_owned();
            let meta =
                MemberMeta::new(entry.compression(), entry.unix_mode(), entry.last_modified());
            if entry.is_dir() {
                index.dirs.insert(name, meta);
                continue;
            }
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;
            index.files.insert(
                name,
                FileRecord {
                    meta,
                    hash: Sha256::digest(&content).into(),
                },
            );
        }
    }
    Ok(index)
}

/// Load full content for the given members from a snapshot
///
/// Reads the canonical archives in order; when a path exists in more than
/// one archive the later one wins.
fn load_contents(
    snapshot: &Snapshot,
    names: &BTreeSet<String>,
) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut contents = BTreeMap::new();
    for archive_name in ARCHIVE_NAMES {
        let mut archive = open_archive(&snapshot.archive_path(archive_name))?;
        for name in names {
            match archive.by_name(name) {
                Ok(mut entry) => {
                    let mut content = Vec::with_capacity(entry.size() as usize);
                    entry.read_to_end(&mut content)?;
                    contents.insert(name.clone(), content);
                }
                Err(ZipError::FileNotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(contents)
}

/// Generate the delta package between two snapshots
///
/// Writes `<old_version + 1>.zip` into the new snapshot's directory and
/// returns its path.
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> Result<PathBuf> {
    info!(
        "Generating delta update from {} to {}",
        old.version(),
        new.version()
    );
    debug!("Scanning for changes between versions");

    let old_index = index_snapshot(old)?;
    let new_index = index_snapshot(new)?;

    let created_dirs: Vec<(&String, MemberMeta)> = new_index
        .dirs
        .iter()
        .filter(|(name, _)| !old_index.dirs.contains_key(*name))
        .map(|(name, meta)| (name, *meta))
        .collect();
    // A file absent from the old snapshot has no hash, so it can never
    // compare equal: created files classify as modified.
    let modified: Vec<(&String, FileRecord)> = new_index
        .files
        .iter()
        .filter(|(name, record)| {
            old_index.files.get(*name).map(|old| old.hash) != Some(record.hash)
        })
        .map(|(name, record)| (name, *record))
        .collect();
    let deleted: Vec<&String> = old_index
        .files
        .keys()
        .filter(|name| !new_index.files.contains_key(*name))
        .collect();

    info!(
        "Created dirs: {}, modified files: {}, deleted files: {}",
        created_dirs.len(),
        modified.len(),
        deleted.len()
    );

    debug!("Loading modified files");
    let wanted: BTreeSet<String> = modified.iter().map(|(name, _)| (*name).clone()).collect();
    let contents = load_contents(new, &wanted)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, meta) in &created_dirs {
        writer.add_directory(name.as_str(), meta.to_options())?;
    }
    for (name, record) in &modified {
        let content = contents
            .get(*name)
            .ok_or_else(|| PatchError::DeltaContent((*name).clone()))?;
        writer.start_file(name.as_str(), record.meta.to_options())?;
        writer.write_all(content)?;
    }
    for name in &deleted {
        // Zero-length member frees the space while keeping the path
        writer.start_file(name.as_str(), SimpleFileOptions::default())?;
    }

    let cursor = writer.finish()?;
    let out_path = new.delta_path(old.version());
    write_archive_atomic(&out_path, &cursor.into_inner())?;
    info!("Delta package written to {}", out_path.display());
    Ok(out_path)
}
