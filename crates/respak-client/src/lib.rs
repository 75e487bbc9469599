//! respak client library
//!
//! This library provides the core functionality for the respak CLI tool.

pub mod commands;

// Re-export command handlers
pub use crate::commands::{
    crypt::handle as handle_crypt, delta::handle as handle_delta, rekey::handle as handle_rekey,
    snapshot::handle_new_version, snapshot::handle_prune,
};

use clap::Subcommand;
use std::path::PathBuf;

/// Re-key operations against the configured keypairs
#[derive(Subcommand)]
pub enum RekeyCommands {
    /// Re-key a single archive in place
    Archive {
        /// Path to the archive to re-key
        path: PathBuf,
    },

    /// Re-key every archive of one version
    Version {
        /// Resource root holding the version directories
        root: PathBuf,

        /// Version whose archives should be re-keyed
        version: u32,
    },
}

/// Default file name of the original client-trusted public key
pub const OLD_PUBLIC_KEY_FILE: &str = "server-public-key-orig.pem";

/// Default file name of the current private key
pub const PRIVATE_KEY_FILE: &str = "server-private-key.pem";

/// Default file name of the current distributed public key
pub const PUBLIC_KEY_FILE: &str = "server-public-key.pem";
