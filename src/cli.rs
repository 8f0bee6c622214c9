use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stowage")]
#[command(author, version, about = "Attachment storage maintenance tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upgrade storage schema of file attachments
    #[command(long_about = "Upgrade storage schema of file attachments.\n\n\
        Moves every attachment stored under an older path layout to the current \
        one and records the new storage schema version. Only the filesystem and \
        S3-compatible backends are supported. The command is safe to re-run: \
        attachments already at the current version are skipped.")]
    StorageSchema {
        /// Report what would be moved without moving or saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
