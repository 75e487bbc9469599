//! Wrapped key records
//!
//! A payload key is wrapped by placing it at the tail of a fixed 256-byte
//! padding block and raising the block, as a big-endian integer, to the
//! *private* exponent. Unwrapping raises the record to the *public* exponent
//! and takes the trailing 32 bytes. The reversed roles let the publisher
//! re-encrypt all content under a freshly generated keypair while shipped
//! clients, which only ever run the public-key operation, keep working once
//! the new public key reaches them inside the updated archives.

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};

use crate::error::Result;
use crate::keys::{PAYLOAD_KEY_LEN, PayloadKey};

/// Size of the wrapped key block in bytes (2048-bit modulus)
pub const WRAP_BLOCK_LEN: usize = 256;

/// Wrap a payload key under a private key
///
/// Builds the block `00 01 FF*221 00 <32-byte key>`, raises it to the
/// private exponent mod n, and returns the result ASCII-hex-encoded
/// (the on-disk `.c` record). Deterministic: the same key under the same
/// private key always produces the same record.
pub fn wrap_key(key: &PayloadKey, private_key: &RsaPrivateKey) -> Vec<u8> {
    let mut block = Vec::with_capacity(WRAP_BLOCK_LEN);
    block.extend_from_slice(&[0x00, 0x01]);
    block.resize(WRAP_BLOCK_LEN - PAYLOAD_KEY_LEN - 1, 0xff);
    block.push(0x00);
    block.extend_from_slice(key.as_bytes());

    let record = BigUint::from_bytes_be(&block).modpow(private_key.d(), private_key.n());
    hex::encode(to_block_be(&record)).into_bytes()
}

/// Unwrap a payload key from an ASCII-hex wrapped record
///
/// Raises the record to the public exponent mod n and returns the trailing
/// 32 bytes. The leading padding bytes are not validated: correctness relies
/// entirely on using the matching keypair, and a mismatched keypair yields
/// garbage key bytes that only surface later as a padding failure during
/// payload decryption.
///
/// # Errors
/// Fails if the record is not valid ASCII hex.
pub fn unwrap_key(record: &[u8], public_key: &RsaPublicKey) -> Result<PayloadKey> {
    let raw = hex::decode(record)?;
    let block = BigUint::from_bytes_be(&raw).modpow(public_key.e(), public_key.n());
    let block = to_block_be(&block);
    PayloadKey::from_slice(&block[WRAP_BLOCK_LEN - PAYLOAD_KEY_LEN..])
}

/// Re-encode a big integer as a 256-byte big-endian block
///
/// Values shorter than the block are left-padded with zeros; values from an
/// oversized modulus keep their trailing 256 bytes.
fn to_block_be(value: &BigUint) -> [u8; WRAP_BLOCK_LEN] {
    let bytes = value.to_bytes_be();
    let mut block = [0u8; WRAP_BLOCK_LEN];
    if bytes.len() >= WRAP_BLOCK_LEN {
        block.copy_from_slice(&bytes[bytes.len() - WRAP_BLOCK_LEN..]);
    } else {
        block[WRAP_BLOCK_LEN - bytes.len()..].copy_from_slice(&bytes);
    }
    block
}
