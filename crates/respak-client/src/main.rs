use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use respak_client::{RekeyCommands, commands};

#[derive(Parser)]
#[command(
    name = "respak",
    about = "Maintain distributable asset snapshots: re-key, delta, prune",
    version,
    long_about = "A command-line tool for maintaining a game's versioned asset \
archives: re-keying the hybrid cipher protecting JSON members, generating \
incremental update packages between versions, and managing version directories."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Directory holding the PEM key material
    #[arg(short, long, global = true, default_value = "keys")]
    keys_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Re-key encrypted archives to the current keypair
    #[command(subcommand)]
    Rekey(RekeyCommands),

    /// Generate a delta update package between two versions
    Delta {
        /// Resource root holding the version directories
        root: PathBuf,
        /// Version to patch from
        old_version: u32,
        /// Version to patch into
        new_version: u32,
    },

    /// Create a new version directory from the previous one
    NewVersion {
        /// Resource root holding the version directories
        root: PathBuf,
        /// Version to copy base archives from
        old_version: u32,
        /// Version to create
        new_version: u32,
    },

    /// Delete base archives of superseded full versions
    Prune {
        /// Resource root holding the version directories
        root: PathBuf,
    },

    /// Encrypt or decrypt loose JSON files, inferred from the extension
    Crypt {
        /// Files to process (`X.dec.json` encrypts, `X.json` decrypts)
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    // Handle commands
    match cli.command {
        Commands::Rekey(cmd) => commands::rekey::handle(cmd, &cli.keys_dir)?,
        Commands::Delta {
            root,
            old_version,
            new_version,
        } => commands::delta::handle(&root, old_version, new_version)?,
        Commands::NewVersion {
            root,
            old_version,
            new_version,
        } => commands::snapshot::handle_new_version(&root, old_version, new_version)?,
        Commands::Prune { root } => commands::snapshot::handle_prune(&root)?,
        Commands::Crypt { files } => commands::crypt::handle(&files, &cli.keys_dir)?,
    }

    Ok(())
}
