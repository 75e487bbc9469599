//! Error types for key-wrap and payload cipher operations

use thiserror::Error;

/// Result type for crypto operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during key-wrap and payload cipher operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Payload key material has the wrong size
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// PKCS#7 padding was invalid after decryption
    ///
    /// Indicates the wrong keypair was used or the ciphertext is corrupt.
    #[error("Invalid padding in decrypted payload (wrong keypair or corrupt data)")]
    InvalidPadding,

    /// Input was not valid ASCII hex
    #[error("Hex decode failed: {0}")]
    Hex(#[from] hex::FromHexError),

    /// PEM key material could not be parsed
    #[error("Invalid key format: {0}")]
    KeyParse(String),

    /// I/O error reading key material
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
