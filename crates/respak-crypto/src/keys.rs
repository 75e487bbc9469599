//! Payload keys and RSA key material loading

use std::fs;
use std::path::Path;

use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CryptoError, Result};

/// Size of a payload key in bytes
///
/// The cipher consumes the 32-byte ASCII-hex form of the derived half-digest
/// directly, so every payload key is exactly 32 bytes.
pub const PAYLOAD_KEY_LEN: usize = 32;

/// Symmetric key protecting one encrypted payload
///
/// Derived keys are the ASCII-hex encoding of the first 16 bytes of the
/// plaintext's SHA-256 digest; unwrapped keys are whatever 32 bytes the
/// key-wrap recovery yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadKey([u8; PAYLOAD_KEY_LEN]);

impl PayloadKey {
    /// Derive the payload key for a plaintext
    ///
    /// Deterministic: identical plaintext always derives the identical key,
    /// so re-encrypting unchanged content reproduces the same key material.
    pub fn derive(plaintext: &[u8]) -> Self {
        let digest = Sha256::digest(plaintext);
        let hex = hex::encode(&digest[..PAYLOAD_KEY_LEN / 2]);
        let mut bytes = [0u8; PAYLOAD_KEY_LEN];
        bytes.copy_from_slice(hex.as_bytes());
        Self(bytes)
    }

    /// Create a payload key from raw bytes
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidKeySize`] unless `bytes` is exactly
    /// 32 bytes. Key material is never truncated or padded.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; PAYLOAD_KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeySize {
                    expected: PAYLOAD_KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_KEY_LEN] {
        &self.0
    }
}

/// Parse an RSA public key from PEM text (SPKI or PKCS#1)
pub fn parse_public_key_pem(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::KeyParse(e.to_string()))
}

/// Parse an RSA private key from PEM text (PKCS#8 or PKCS#1)
pub fn parse_private_key_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::KeyParse(e.to_string()))
}

/// Load an RSA public key from a PEM file
pub fn load_public_key(path: &Path) -> Result<RsaPublicKey> {
    let pem = fs::read_to_string(path)?;
    parse_public_key_pem(&pem)
}

/// Load an RSA private key from a PEM file
pub fn load_private_key(path: &Path) -> Result<RsaPrivateKey> {
    let pem = fs::read_to_string(path)?;
    parse_private_key_pem(&pem)
}

/// Key material for one re-key operation
///
/// Loaded once and treated as read-only for the rest of the run. Exactly two
/// keypairs are in play: the *old* pair, whose public half shipped clients
/// already trust, and the *new* pair controlled by the publisher. Only the
/// public half of the new pair is ever written into archives.
#[derive(Debug, Clone)]
pub struct RekeyKeys {
    /// Public half of the keypair currently trusted by installed clients
    pub old_public: RsaPublicKey,
    /// Private half of the replacement keypair
    pub new_private: RsaPrivateKey,
    /// PEM bytes of the replacement public key, written into archives verbatim
    pub new_public_pem: Vec<u8>,
}

impl RekeyKeys {
    /// Load re-key material from PEM files
    pub fn load(old_public: &Path, new_private: &Path, new_public: &Path) -> Result<Self> {
        let old_public = load_public_key(old_public)?;
        let new_private = load_private_key(new_private)?;
        let new_public_pem = fs::read_to_string(new_public)?;
        // Parse to catch malformed key material up front; the bytes
        // themselves are what gets distributed.
        parse_public_key_pem(&new_public_pem)?;
        debug!("Loaded re-key material");
        Ok(Self {
            old_public,
            new_private,
            new_public_pem: new_public_pem.into_bytes(),
        })
    }
}
