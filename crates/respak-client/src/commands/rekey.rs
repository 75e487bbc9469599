//! Re-key command handlers

use std::path::Path;

use anyhow::{Context, Result};
use respak_archive::Snapshot;
use respak_crypto::RekeyKeys;
use respak_patch::Rekeyer;

use crate::{OLD_PUBLIC_KEY_FILE, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE, RekeyCommands};

/// Handle a re-key subcommand
pub fn handle(cmd: RekeyCommands, keys_dir: &Path) -> Result<()> {
    let keys = load_keys(keys_dir)?;
    let rekeyer = Rekeyer::new(&keys);

    match cmd {
        RekeyCommands::Archive { path } => rekeyer
            .rekey_archive(&path)
            .with_context(|| format!("re-keying {}", path.display())),
        RekeyCommands::Version { root, version } => {
            let snapshot = Snapshot::new(root, version);
            rekeyer
                .rekey_version(&snapshot)
                .with_context(|| format!("re-keying version {version}"))
        }
    }
}

fn load_keys(keys_dir: &Path) -> Result<RekeyKeys> {
    let old_public = keys_dir.join(OLD_PUBLIC_KEY_FILE);
    let new_private = keys_dir.join(PRIVATE_KEY_FILE);
    let new_public = keys_dir.join(PUBLIC_KEY_FILE);
    RekeyKeys::load(&old_public, &new_private, &new_public)
        .with_context(|| format!("loading re-key material from {}", keys_dir.display()))
}
