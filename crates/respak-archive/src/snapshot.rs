//! Snapshot layout and member resolution
//!
//! A snapshot is one versioned directory of base archives representing the
//! full asset state at that version. Member paths may occur in more than
//! one archive of a snapshot; the archive listed later in
//! [`ARCHIVE_NAMES`] is authoritative for that path.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::trace;
use zip::result::ZipError;

use crate::error::Result;
use crate::rewrite::{ReplaceMode, open_archive, rewrite_archive};

/// Base archive file names of one snapshot, in canonical order
///
/// This is the order the game downloads and extracts them in on install.
/// Later entries shadow earlier ones when the same member path occurs in
/// more than one archive; the member reader and the snapshot differ both
/// resolve duplicates against this single ordering.
pub const ARCHIVE_NAMES: [&str; 13] = [
    "1_bg.zip",
    "1_card160.zip",
    "1_card640.zip",
    "1_effect.zip",
    "1_icon.zip",
    "1_stand.zip",
    "1_movie.zip",
    "1_sound.zip",
    "1_ssbp.zip",
    "1_json01.zip",
    "1_json02.zip",
    "1_json03.zip",
    "1_pkg.zip",
];

/// The catch-all package archive holding the version manifest
pub const PACKAGE_ARCHIVE: &str = "1_pkg.zip";

/// Member name of the version manifest inside [`PACKAGE_ARCHIVE`]
pub const VERSION_MANIFEST: &str = "version.json";

/// One versioned snapshot of the full asset state
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    version: u32,
}

impl Snapshot {
    /// Reference the snapshot for `version` under `root`
    pub fn new(root: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            root: root.into(),
            version,
        }
    }

    /// Snapshot version number
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Resource root this snapshot lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding this snapshot's archives
    pub fn dir(&self) -> PathBuf {
        self.root.join(self.version.to_string())
    }

    /// Path of one archive inside this snapshot
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.dir().join(name)
    }

    /// Paths of the given archives, in the order given
    pub fn archive_paths(&self, archives: &[&str]) -> Vec<PathBuf> {
        archives.iter().map(|name| self.archive_path(name)).collect()
    }

    /// Path the delta package patching from `old_version` is written to
    pub fn delta_path(&self, old_version: u32) -> PathBuf {
        self.dir().join(format!("{}.zip", old_version + 1))
    }

    /// Read a member across this snapshot's archives
    ///
    /// Searches `archives` in reverse of the given (canonical) order, so the
    /// last-listed archive containing the path wins. Returns `None` when no
    /// archive contains the path; a missing archive *file* is an error.
    pub fn read_member(&self, name: &str, archives: &[&str]) -> Result<Option<Vec<u8>>> {
        for archive_name in archives.iter().rev() {
            let path = self.archive_path(archive_name);
            let mut archive = open_archive(&path)?;
            match archive.by_name(name) {
                Ok(mut entry) => {
                    trace!("Resolved {name} from {archive_name}");
                    let mut content = Vec::with_capacity(entry.size() as usize);
                    entry.read_to_end(&mut content)?;
                    return Ok(Some(content));
                }
                Err(ZipError::FileNotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    /// Apply a replacement set across this snapshot's archives
    ///
    /// Each archive is rewritten in [`ReplaceMode::ExistingOnly`], so only
    /// members that already exist somewhere are replaced and archives
    /// without any matching member are left untouched.
    pub fn replace_in_archives(
        &self,
        replacements: &BTreeMap<String, Vec<u8>>,
        archives: &[&str],
    ) -> Result<()> {
        for archive_name in archives {
            rewrite_archive(
                &self.archive_path(archive_name),
                replacements,
                ReplaceMode::ExistingOnly,
            )?;
        }
        Ok(())
    }
}
