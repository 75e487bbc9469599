//! Loose-file crypt command handler
//!
//! Operation is inferred from the file name: `X.dec.json` is encrypted back
//! into its `X.json`/`X.c` pair, any other `.json` file is decrypted to
//! `X.dec.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use respak_crypto::{load_private_key, load_public_key};
use respak_patch::{DECRYPTED_EXT, decrypt_file, encrypt_file};
use tracing::warn;

use crate::{PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};

/// Encrypt or decrypt each listed file, by extension
pub fn handle(files: &[PathBuf], keys_dir: &Path) -> Result<()> {
    if files.is_empty() {
        bail!("no files given");
    }

    for path in files {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        if name.ends_with(DECRYPTED_EXT) {
            let private_key = load_private_key(&keys_dir.join(PRIVATE_KEY_FILE))
                .with_context(|| format!("loading private key from {}", keys_dir.display()))?;
            let (payload, record) = encrypt_file(path, &private_key)
                .with_context(|| format!("encrypting {}", path.display()))?;
            println!("{} -> {}, {}", path.display(), payload.display(), record.display());
        } else if name.ends_with(".json") {
            let public_key = load_public_key(&keys_dir.join(PUBLIC_KEY_FILE))
                .with_context(|| format!("loading public key from {}", keys_dir.display()))?;
            let decrypted = decrypt_file(path, &public_key)
                .with_context(|| format!("decrypting {}", path.display()))?;
            println!("{} -> {}", path.display(), decrypted.display());
        } else {
            warn!("Unsupported file extension, skipping {}", path.display());
        }
    }
    Ok(())
}
