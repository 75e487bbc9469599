//! Shared helpers for building zip fixtures on disk

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use respak_archive::{ARCHIVE_NAMES, PACKAGE_ARCHIVE, Snapshot, VERSION_MANIFEST};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Build a zip archive at `path` with the given members
///
/// Member names ending in `/` become directory entries.
pub fn build_archive(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create archive fixture");
    let mut writer = ZipWriter::new(file);
    for (name, content) in members {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .expect("add fixture directory");
        } else {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start fixture member");
            writer.write_all(content).expect("write fixture member");
        }
    }
    writer.finish().expect("finish fixture archive");
}

/// Build a full snapshot with all canonical archives
///
/// Archives named in `members` get those members; the package archive always
/// carries a version manifest; everything else is an empty archive.
pub fn build_full_snapshot(
    root: &Path,
    version: u32,
    members: &[(&str, &[(&str, &[u8])])],
) -> Snapshot {
    let snapshot = Snapshot::new(root, version);
    fs::create_dir_all(snapshot.dir()).expect("create snapshot dir");

    for archive_name in ARCHIVE_NAMES {
        let mut entries: Vec<(&str, &[u8])> = members
            .iter()
            .find(|(name, _)| *name == archive_name)
            .map(|(_, entries)| entries.to_vec())
            .unwrap_or_default();

        let manifest = format!("[{{\"version\":{version}}}]");
        if archive_name == PACKAGE_ARCHIVE
            && !entries.iter().any(|(name, _)| *name == VERSION_MANIFEST)
        {
            entries.push((VERSION_MANIFEST, manifest.as_bytes()));
        }
        build_archive(&snapshot.archive_path(archive_name), &entries);
    }
    snapshot
}

/// Read one member of an archive on disk, panicking when absent
pub fn read_archive_member(path: &Path, name: &str) -> Vec<u8> {
    use std::io::Read;
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("parse archive");
    let mut entry = archive.by_name(name).expect("member should exist");
    let mut content = Vec::new();
    entry.read_to_end(&mut content).expect("read member");
    content
}

/// Names of every member in an archive on disk
pub fn archive_member_names(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("open archive");
    let archive = zip::ZipArchive::new(file).expect("parse archive");
    archive.file_names().map(String::from).collect()
}
