//! Error types for re-key and delta operations

use std::path::PathBuf;

use respak_archive::ArchiveError;
use respak_crypto::CryptoError;
use thiserror::Error;

/// Result type for re-key and delta operations
pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors that can occur during re-key and delta operations
#[derive(Debug, Error)]
pub enum PatchError {
    /// Crypto operation failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Archive operation failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Archive structure is unreadable or corrupt
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required file is absent
    #[error("Missing file: {0}")]
    MissingFile(PathBuf),

    /// Decrypting one member failed
    ///
    /// Wraps the crypto failure with the offending member so a keypair
    /// mismatch names the file it surfaced on.
    #[error("Failed to decrypt {member}: {source}")]
    Decrypt {
        /// Member or file the decrypt failed on
        member: String,
        /// Underlying crypto failure
        source: CryptoError,
    },

    /// Decrypted content was not valid UTF-8
    #[error("Decrypted content of {0} is not valid UTF-8")]
    Utf8(String),

    /// A member expected to hold JSON does not carry the JSON extension
    #[error("Not a JSON member: {0}")]
    NotJson(String),

    /// File name does not match any crypt convention
    #[error("Unsupported file extension: {0}")]
    UnsupportedFile(PathBuf),

    /// A modified member vanished between scan and content load
    #[error("Delta content missing for member: {0}")]
    DeltaContent(String),
}
