//! Error types for archive and snapshot operations

use std::path::PathBuf;

use thiserror::Error;

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur during archive and snapshot operations
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive structure is unreadable or corrupt
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A required archive file is absent
    #[error("Missing archive: {0}")]
    MissingArchive(PathBuf),

    /// A required member is absent from an archive
    #[error("Missing member {name} in {archive}")]
    MissingMember {
        /// Archive the member was expected in
        archive: PathBuf,
        /// Member path inside the archive
        name: String,
    },

    /// Version manifest content could not be parsed
    #[error("Invalid version manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Version directory already exists
    #[error("Version directory already exists: {0}")]
    VersionExists(PathBuf),
}
