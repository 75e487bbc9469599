//! Key-wrap codec and payload cipher for respak asset archives
//!
//! Encrypted JSON members inside the game's asset archives are protected by
//! a hybrid scheme: each payload is encrypted under its own symmetric key,
//! and that key is wrapped with an RSA keypair in reversed roles (the
//! publisher's *private* key wraps, the client's *public* key unwraps).
//!
//! # Components
//!
//! - **Key derivation**: [`PayloadKey::derive`] produces a deterministic
//!   per-payload key from the plaintext's SHA-256 digest
//! - **Key wrap**: [`wrap_key`] / [`unwrap_key`] move a payload key through
//!   the fixed 256-byte record format stored in `.c` sibling files
//! - **Payload cipher**: [`encrypt_payload`] / [`decrypt_payload`] handle
//!   the hex-encoded AES-256-ECB payload format
//! - **Key material**: [`RekeyKeys`] carries the two keypairs of a re-key
//!   operation, loaded once from PEM files and passed in explicitly
//!
//! # Examples
//!
//! ```
//! use respak_crypto::{PayloadKey, decrypt_payload, encrypt_payload};
//!
//! let plaintext = b"{\"a\":1}";
//! let key = PayloadKey::derive(plaintext);
//!
//! let ciphertext = encrypt_payload(plaintext, &key);
//! let decrypted = decrypt_payload(&ciphertext, &key)?;
//! assert_eq!(&decrypted, plaintext);
//! # Ok::<(), respak_crypto::CryptoError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod keys;
pub mod payload;
pub mod wrap;

pub use error::{CryptoError, Result};

// Re-export commonly used items
pub use keys::{
    PAYLOAD_KEY_LEN, PayloadKey, RekeyKeys, load_private_key, load_public_key,
    parse_private_key_pem, parse_public_key_pem,
};
pub use payload::{decrypt_payload, encrypt_payload};
pub use wrap::{WRAP_BLOCK_LEN, unwrap_key, wrap_key};
