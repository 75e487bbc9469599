#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Snapshot member resolution and version management

mod common;

use std::collections::BTreeMap;

use common::{build_full_snapshot, read_archive_member};
use pretty_assertions::assert_eq;
use respak_archive::{
    ARCHIVE_NAMES, ArchiveError, PACKAGE_ARCHIVE, Snapshot, create_version, list_full_versions,
    list_versions, prune_full_versions, read_version_manifest,
};

#[test]
fn later_archive_shadows_earlier_one() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = build_full_snapshot(
        dir.path(),
        729,
        &[
            ("1_json01.zip", &[("json/master_card.json", b"from json01")]),
            ("1_json02.zip", &[("json/master_card.json", b"from json02")]),
        ],
    );

    let content = snapshot
        .read_member("json/master_card.json", &ARCHIVE_NAMES)
        .expect("read should succeed")
        .expect("member should resolve");
    assert_eq!(content, b"from json02");
}

#[test]
fn absent_member_is_none_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = build_full_snapshot(dir.path(), 729, &[]);

    let content = snapshot
        .read_member("json/nothing_here.json", &ARCHIVE_NAMES)
        .expect("read should succeed");
    assert_eq!(content, None);
}

#[test]
fn limiting_the_search_set_hides_members() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = build_full_snapshot(
        dir.path(),
        729,
        &[("1_icon.zip", &[("icon/0001.png", b"png bytes")])],
    );

    let hit = snapshot
        .read_member("icon/0001.png", &["1_icon.zip"])
        .unwrap();
    assert_eq!(hit, Some(b"png bytes".to_vec()));

    let miss = snapshot
        .read_member("icon/0001.png", &["1_bg.zip", "1_sound.zip"])
        .unwrap();
    assert_eq!(miss, None);
}

#[test]
fn missing_archive_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("729")).unwrap();
    let snapshot = Snapshot::new(dir.path(), 729);

    let result = snapshot.read_member("anything", &ARCHIVE_NAMES);
    assert!(matches!(result, Err(ArchiveError::MissingArchive(_))));
}

#[test]
fn replace_in_archives_touches_every_archive_with_the_member() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = build_full_snapshot(
        dir.path(),
        729,
        &[
            ("1_json01.zip", &[("json/shop.json", b"one")]),
            ("1_json03.zip", &[("json/shop.json", b"three")]),
        ],
    );

    let mut replacements = BTreeMap::new();
    replacements.insert("json/shop.json".to_owned(), b"patched".to_vec());
    snapshot
        .replace_in_archives(&replacements, &ARCHIVE_NAMES)
        .expect("replace should succeed");

    assert_eq!(
        read_archive_member(&snapshot.archive_path("1_json01.zip"), "json/shop.json"),
        b"patched"
    );
    assert_eq!(
        read_archive_member(&snapshot.archive_path("1_json03.zip"), "json/shop.json"),
        b"patched"
    );
}

#[test]
fn delta_path_names_by_incremented_old_version() {
    let snapshot = Snapshot::new("res", 730);
    assert_eq!(
        snapshot.delta_path(729),
        std::path::Path::new("res").join("730").join("730.zip")
    );
}

#[test]
fn create_version_copies_archives_and_bumps_manifest() {
    let dir = tempfile::tempdir().unwrap();
    build_full_snapshot(
        dir.path(),
        729,
        &[("1_bg.zip", &[("bg/town.png", b"town")])],
    );

    let new = create_version(dir.path(), 729, 730).expect("create should succeed");

    assert_eq!(read_version_manifest(&new).unwrap(), 730);
    assert_eq!(
        read_archive_member(&new.archive_path("1_bg.zip"), "bg/town.png"),
        b"town"
    );
    // Old snapshot manifest is untouched
    let old = Snapshot::new(dir.path(), 729);
    assert_eq!(read_version_manifest(&old).unwrap(), 729);
}

#[test]
fn create_version_refuses_to_clobber() {
    let dir = tempfile::tempdir().unwrap();
    build_full_snapshot(dir.path(), 729, &[]);
    build_full_snapshot(dir.path(), 730, &[]);

    let result = create_version(dir.path(), 729, 730);
    assert!(matches!(result, Err(ArchiveError::VersionExists(_))));
}

#[test]
fn prune_keeps_earliest_and_latest_full_versions() {
    let dir = tempfile::tempdir().unwrap();
    for version in [700, 710, 720, 730] {
        build_full_snapshot(dir.path(), version, &[]);
    }
    // Delta packages sit alongside base archives
    std::fs::write(dir.path().join("710").join("701.zip"), b"delta").unwrap();

    let pruned = prune_full_versions(dir.path()).expect("prune should succeed");
    assert_eq!(pruned, vec![710, 720]);

    assert_eq!(list_versions(dir.path()).unwrap(), vec![700, 710, 720, 730]);
    assert_eq!(list_full_versions(dir.path()).unwrap(), vec![700, 730]);
    // Base archives of pruned versions are gone, deltas survive
    assert!(!dir.path().join("710").join(PACKAGE_ARCHIVE).exists());
    assert!(dir.path().join("710").join("701.zip").exists());
}

#[test]
fn prune_with_two_full_versions_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    build_full_snapshot(dir.path(), 729, &[]);
    build_full_snapshot(dir.path(), 730, &[]);

    let pruned = prune_full_versions(dir.path()).expect("prune should succeed");
    assert!(pruned.is_empty());
    assert_eq!(list_full_versions(dir.path()).unwrap(), vec![729, 730]);
}
