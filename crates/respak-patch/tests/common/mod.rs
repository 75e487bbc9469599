//! Shared helpers: key material and on-disk zip/snapshot fixtures

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, dead_code)]

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use respak_archive::{ARCHIVE_NAMES, PACKAGE_ARCHIVE, Snapshot, VERSION_MANIFEST};
use respak_crypto::{
    PayloadKey, RekeyKeys, encrypt_payload, parse_private_key_pem, parse_public_key_pem, wrap_key,
};
use rsa::{RsaPrivateKey, RsaPublicKey};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// PEM of the keypair shipped with the unmodified client ("old" pair)
pub const OLD_PRIVATE_PEM: &str = include_str!("../fixtures/test-private-key.pem");
pub const OLD_PUBLIC_PEM: &str = include_str!("../fixtures/test-public-key.pem");

/// PEM of the publisher-controlled replacement keypair ("new" pair)
pub const NEW_PRIVATE_PEM: &str = include_str!("../fixtures/alt-private-key.pem");
pub const NEW_PUBLIC_PEM: &str = include_str!("../fixtures/alt-public-key.pem");

pub fn old_private_key() -> RsaPrivateKey {
    parse_private_key_pem(OLD_PRIVATE_PEM).expect("old private key should parse")
}

pub fn old_public_key() -> RsaPublicKey {
    parse_public_key_pem(OLD_PUBLIC_PEM).expect("old public key should parse")
}

pub fn new_private_key() -> RsaPrivateKey {
    parse_private_key_pem(NEW_PRIVATE_PEM).expect("new private key should parse")
}

pub fn new_public_key() -> RsaPublicKey {
    parse_public_key_pem(NEW_PUBLIC_PEM).expect("new public key should parse")
}

pub fn rekey_keys() -> RekeyKeys {
    RekeyKeys {
        old_public: old_public_key(),
        new_private: new_private_key(),
        new_public_pem: NEW_PUBLIC_PEM.as_bytes().to_vec(),
    }
}

/// Encrypted payload + wrapped-key record for a plaintext under the old pair
pub fn encrypted_pair(plaintext: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let key = PayloadKey::derive(plaintext);
    (
        encrypt_payload(plaintext, &key),
        wrap_key(&key, &old_private_key()),
    )
}

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

/// All file members of an archive as (name, content) pairs
pub fn archive_files(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = File::open(path).expect("open archive");
    let mut archive = zip::ZipArchive::new(file).expect("parse archive");
    let mut files = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("read member");
        if entry.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read member");
        files.push((entry.name().to_owned(), content));
    }
    files
}
