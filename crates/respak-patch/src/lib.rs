//! Archive re-keying and delta update generation for respak asset snapshots
//!
//! The two whole-snapshot operations of the pipeline live here:
//!
//! - **Re-keying** ([`Rekeyer`]): moves every encrypted JSON/key-file pair
//!   of an archive from the old keypair to a freshly derived key under the
//!   new keypair, leaving content byte-identical
//! - **Delta generation** ([`diff_snapshots`]): compares two full snapshots
//!   by content hash and emits one patch archive with full replacement
//!   files and zero-length tombstones
//!
//! Plus the decrypted-resource access business-logic collaborators build
//! on: [`read_decrypted_json`], [`encrypt_replacements`], and the
//! loose-file codec helpers.

#![warn(missing_docs)]

pub mod delta;
pub mod error;
pub mod rekey;
pub mod resources;

pub use delta::diff_snapshots;
pub use error::{PatchError, Result};
pub use rekey::{PUBLIC_KEY_MEMBER, Rekeyer};
pub use resources::{
    DECRYPTED_EXT, decrypt_file, encrypt_file, encrypt_replacements, read_decrypted_json,
};

/// File extension of encrypted JSON payload members
pub const PAYLOAD_EXT: &str = ".json";

/// File extension of wrapped-key sibling members
pub const WRAPPED_KEY_EXT: &str = ".c";

/// Wrapped-key sibling name for a JSON payload member
///
/// Returns `None` when `name` does not carry the JSON extension.
///
/// ```
/// assert_eq!(
///     respak_patch::wrapped_key_name("json/master_card.json").as_deref(),
///     Some("json/master_card.c")
/// );
/// assert_eq!(respak_patch::wrapped_key_name("bg/town.png"), None);
/// ```
pub fn wrapped_key_name(name: &str) -> Option<String> {
    name.strip_suffix(PAYLOAD_EXT)
        .map(|stem| format!("{stem}{WRAPPED_KEY_EXT}"))
}
