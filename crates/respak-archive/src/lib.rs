//! Zip member rewriting and snapshot layout for respak asset archives
//!
//! The game's asset state at one version (a *snapshot*) is a directory of
//! zip archives downloaded and extracted in a fixed canonical order. This
//! crate owns the raw archive plumbing shared by the re-keyer and the
//! snapshot differ:
//!
//! - **Rewriting**: [`rewrite_archive`] replaces or inserts named members
//!   while every untouched member keeps its exact header and compressed
//!   bytes, committing through a temp file so the source archive survives
//!   any failure intact
//! - **Resolution**: [`Snapshot::read_member`] resolves a member path
//!   across a snapshot's archives with last-listed-wins shadowing
//! - **Version management**: creating a new version directory from the
//!   previous one and pruning base archives of superseded versions
//!
//! Cryptography lives in `respak-crypto`; this crate never looks inside
//! member content.

#![warn(missing_docs)]

pub mod error;
pub mod member;
pub mod rewrite;
pub mod snapshot;
pub mod versions;

pub use error::{ArchiveError, Result};

// Re-export commonly used items
pub use member::MemberMeta;
pub use rewrite::{ReplaceMode, open_archive, rewrite_archive, write_archive_atomic};
pub use snapshot::{ARCHIVE_NAMES, PACKAGE_ARCHIVE, Snapshot, VERSION_MANIFEST};
pub use versions::{
    VersionRecord, create_version, list_full_versions, list_versions, prune_full_versions,
    read_version_manifest,
};
