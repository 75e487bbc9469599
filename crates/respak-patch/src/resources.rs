//! Decrypted resource access and replacement-set encryption
//!
//! Business-logic collaborators read game JSON through
//! [`read_decrypted_json`], mutate it, and hand the plaintext back through
//! [`encrypt_replacements`] for the snapshot rewrite. The loose-file
//! helpers cover the same codec for files extracted to disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::debug;

use respak_archive::Snapshot;
use respak_crypto::{PayloadKey, decrypt_payload, encrypt_payload, unwrap_key, wrap_key};

use crate::error::{PatchError, Result};
use crate::{PAYLOAD_EXT, wrapped_key_name};

/// Extension of decrypted loose files on disk
pub const DECRYPTED_EXT: &str = ".dec.json";

/// Read an encrypted JSON member of a snapshot, decrypted to text
///
/// Both `<name>.json` and its wrapped-key sibling must resolve to
/// non-empty bytes; otherwise the member is absent. Zero-length members
/// are tombstones left by delta updates and count as absent too.
pub fn read_decrypted_json(
    snapshot: &Snapshot,
    name: &str,
    public_key: &RsaPublicKey,
    archives: &[&str],
) -> Result<Option<String>> {
    let sibling = wrapped_key_name(name).ok_or_else(|| PatchError::NotJson(name.to_owned()))?;

    let Some(payload) = snapshot.read_member(name, archives)?.filter(|c| !c.is_empty()) else {
        return Ok(None);
    };
    let Some(record) = snapshot
        .read_member(&sibling, archives)?
        .filter(|c| !c.is_empty())
    else {
        return Ok(None);
    };

    let key = unwrap_key(&record, public_key)?;
    let plaintext = decrypt_payload(&payload, &key).map_err(|e| PatchError::Decrypt {
        member: name.to_owned(),
        source: e,
    })?;
    String::from_utf8(plaintext)
        .map(Some)
        .map_err(|_| PatchError::Utf8(name.to_owned()))
}

/// Encrypt every JSON entry of a replacement set
///
/// Each `*.json` value is replaced by its encrypted payload, and the
/// matching wrapped-key sibling entry is added. Non-JSON entries pass
/// through unchanged.
pub fn encrypt_replacements(
    replacements: BTreeMap<String, Vec<u8>>,
    private_key: &RsaPrivateKey,
) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    for (name, content) in replacements {
        let Some(sibling) = wrapped_key_name(&name) else {
            out.insert(name, content);
            continue;
        };
        let key = PayloadKey::derive(&content);
        out.insert(sibling, wrap_key(&key, private_key));
        out.insert(name, encrypt_payload(&content, &key));
    }
    out
}

/// Decrypt a loose `.json`/`.c` pair on disk
///
/// Accepts `X.json` or `X.enc.json`; writes `X.dec.json` next to it and
/// returns the written path. Escaped `\uXXXX` sequences are expanded for
/// editor legibility.
pub fn decrypt_file(json_path: &Path, public_key: &RsaPublicKey) -> Result<PathBuf> {
    let (dir, stem) = split_loose_name(json_path, &[".enc.json", PAYLOAD_EXT])?;

    let payload = read_file(json_path)?;
    let record = read_file(&dir.join(format!("{stem}.c")))?;

    let key = unwrap_key(&record, public_key)?;
    let plaintext = decrypt_payload(&payload, &key).map_err(|e| PatchError::Decrypt {
        member: json_path.display().to_string(),
        source: e,
    })?;
    let text = String::from_utf8(plaintext)
        .map_err(|_| PatchError::Utf8(json_path.display().to_string()))?;

    let out_path = dir.join(format!("{stem}{DECRYPTED_EXT}"));
    fs::write(&out_path, unescape_unicode(&text))?;
    debug!("Decrypted {} to {}", json_path.display(), out_path.display());
    Ok(out_path)
}

/// Encrypt a loose decrypted file back into its `.json`/`.c` pair
///
/// Takes `X.dec.json`; writes `X.json` and `X.c` next to it and returns
/// both written paths.
pub fn encrypt_file(
    plain_path: &Path,
    private_key: &RsaPrivateKey,
) -> Result<(PathBuf, PathBuf)> {
    let (dir, stem) = split_loose_name(plain_path, &[DECRYPTED_EXT])?;

    let plaintext = read_file(plain_path)?;
    let key = PayloadKey::derive(&plaintext);

    let record_path = dir.join(format!("{stem}.c"));
    let payload_path = dir.join(format!("{stem}.json"));
    fs::write(&record_path, wrap_key(&key, private_key))?;
    fs::write(&payload_path, encrypt_payload(&plaintext, &key))?;
    debug!("Encrypted {} to {}", plain_path.display(), payload_path.display());
    Ok((payload_path, record_path))
}

/// Split a loose file path into its directory and extension-stripped stem
fn split_loose_name<'a>(path: &'a Path, extensions: &[&str]) -> Result<(&'a Path, &'a str)> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| PatchError::UnsupportedFile(path.to_path_buf()))?;
    for ext in extensions {
        if let Some(stem) = name.strip_suffix(ext) {
            return Ok((path.parent().unwrap_or(Path::new("")), stem));
        }
    }
    Err(PatchError::UnsupportedFile(path.to_path_buf()))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PatchError::MissingFile(path.to_path_buf())
        } else {
            PatchError::Io(e)
        }
    })
}

/// Expand `\uXXXX` escape sequences to their characters
///
/// Sequences that do not form a valid character are left as-is.
fn unescape_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let expanded = tail
            .get(2..6)
            .filter(|_| {
                let marker = tail.as_bytes().get(1);
                marker == Some(&b'u') || marker == Some(&b'U')
            })
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        if let Some(c) = expanded {
            out.push(c);
            rest = &tail[6..];
        } else {
            out.push('\\');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}
