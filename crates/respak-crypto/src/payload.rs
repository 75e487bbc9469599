//! Payload encryption
//!
//! Payloads are PKCS#7-padded and encrypted with AES-256-ECB under the
//! 32-byte payload key, then ASCII-hex-encoded for storage. Each 16-byte
//! block is encrypted independently; there is no chaining and no IV, so
//! identical plaintext blocks under one key yield identical ciphertext
//! blocks. That is the format the game client expects.

use aes::Aes256;
use cipher::block_padding::Pkcs7;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};

use crate::error::{CryptoError, Result};
use crate::keys::PayloadKey;

type Aes256EcbEnc = ecb::Encryptor<Aes256>;
type Aes256EcbDec = ecb::Decryptor<Aes256>;

/// Encrypt a plaintext payload, returning ASCII-hex ciphertext
pub fn encrypt_payload(plaintext: &[u8], key: &PayloadKey) -> Vec<u8> {
    let key = *key.as_bytes();
    let ciphertext = Aes256EcbEnc::new(&key.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);
    hex::encode(ciphertext).into_bytes()
}

/// Decrypt an ASCII-hex ciphertext payload
///
/// # Errors
/// Returns [`CryptoError::Hex`] on malformed hex and
/// [`CryptoError::InvalidPadding`] when the decrypted block does not end in
/// valid PKCS#7 padding, which is how a wrong keypair surfaces.
pub fn decrypt_payload(ciphertext: &[u8], key: &PayloadKey) -> Result<Vec<u8>> {
    let raw = hex::decode(ciphertext)?;
    let key = *key.as_bytes();
    Aes256EcbDec::new(&key.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&raw)
        .map_err(|_| CryptoError::InvalidPadding)
}
