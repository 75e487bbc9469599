//! Archive re-keying
//!
//! Walks every member of an archive and moves each encrypted JSON/key-file
//! pair from the old keypair to the new one: unwrap with the old public key,
//! decrypt, derive a fresh key from the recovered plaintext, wrap it under
//! the new private key, re-encrypt. Content is unchanged; only the
//! protecting key material changes. The distributed public key member is
//! swapped for the new public key in the same pass, so patched clients keep
//! unwrapping successfully.

use std::fs;
use std::io::{Cursor, ErrorKind, Read, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};
use zip::{ZipArchive, ZipWriter};

use respak_archive::{MemberMeta, Snapshot, write_archive_atomic};
use respak_crypto::{PayloadKey, RekeyKeys, decrypt_payload, encrypt_payload, unwrap_key, wrap_key};

use crate::error::{PatchError, Result};
use crate::{PAYLOAD_EXT, WRAPPED_KEY_EXT, wrapped_key_name};

/// Name of the distributed public key member inside archives
pub const PUBLIC_KEY_MEMBER: &str = "server-public-key.pem";

/// Re-keys archives against a fixed set of key material
pub struct Rekeyer<'a> {
    keys: &'a RekeyKeys,
}

impl<'a> Rekeyer<'a> {
    /// Create a re-keyer over loaded key material
    pub fn new(keys: &'a RekeyKeys) -> Self {
        Self { keys }
    }

    /// Re-key every encrypted member of the archive at `path`, in place
    pub fn rekey_archive(&self, path: &Path) -> Result<()> {
        let mut archive = respak_archive::open_archive(path)?;
        let names: Vec<String> = archive.file_names().map(String::from).collect();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i)?;
            let name = entry.name().to_owned();

            if entry.is_dir() {
                writer.raw_copy_file(entry)?;
                continue;
            }
            if name.ends_with(PUBLIC_KEY_MEMBER) {
                let options =
                    MemberMeta::new(entry.compression(), entry.unix_mode(), entry.last_modified())
                        .to_options();
                drop(entry);
                debug!("Replacing distributed public key member {name}");
                writer.start_file(name, options)?;
                writer.write_all(&self.keys.new_public_pem)?;
                continue;
            }
            if name.ends_with(WRAPPED_KEY_EXT) {
                // Processed alongside its JSON sibling
                continue;
            }
            if !name.ends_with(PAYLOAD_EXT) {
                writer.raw_copy_file(entry)?;
                continue;
            }
            let sibling = match wrapped_key_name(&name) {
                Some(sibling) if names.contains(&sibling) => sibling,
                // No wrapped key: member is stored as plaintext
                _ => {
                    writer.raw_copy_file(entry)?;
                    continue;
                }
            };

            drop(entry);
            self.rekey_pair(&mut archive, &mut writer, &name, &sibling)?;
        }

        let cursor = writer.finish()?;
        write_archive_atomic(path, &cursor.into_inner())?;
        info!("{} re-encrypted with new key", path.display());
        Ok(())
    }

    /// Re-key every `.zip` archive in a snapshot's directory
    ///
    /// Walks the directory listing rather than the canonical archive set,
    /// so any extra archives dropped into the version directory are
    /// re-keyed as well.
    pub fn rekey_version(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = snapshot.dir();
        let entries = fs::read_dir(&dir).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PatchError::MissingFile(dir.clone())
            } else {
                PatchError::Io(e)
            }
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for dir_entry in entries {
            let path = dir_entry?.path();
            if path.extension().is_some_and(|ext| ext == "zip") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            self.rekey_archive(path)?;
        }
        Ok(())
    }

    fn rekey_pair<R: Read + Seek, W: Write + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        writer: &mut ZipWriter<W>,
        payload_name: &str,
        record_name: &str,
    ) -> Result<()> {
        trace!("Re-keying {payload_name}");
        let (old_record, record_meta) = read_member(archive, record_name)?;
        let (old_payload, payload_meta) = read_member(archive, payload_name)?;

        let old_key = unwrap_key(&old_record, &self.keys.old_public)?;
        let plaintext = decrypt_payload(&old_payload, &old_key).map_err(|e| {
            PatchError::Decrypt {
                member: payload_name.to_owned(),
                source: e,
            }
        })?;

        let new_key = PayloadKey::derive(&plaintext);
        let new_record = wrap_key(&new_key, &self.keys.new_private);
        let new_payload = encrypt_payload(&plaintext, &new_key);

        writer.start_file(record_name, record_meta.to_options())?;
        writer.write_all(&new_record)?;
        writer.start_file(payload_name, payload_meta.to_options())?;
        writer.write_all(&new_payload)?;
        Ok(())
    }
}

fn read_member<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<(Vec<u8>, MemberMeta)> {
    let mut entry = archive.by_name(name)?;
    let meta = MemberMeta::new(entry.compression(), entry.unix_mode(), entry.last_modified());
    let mut content = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut content)?;
    Ok((content, meta))
}
