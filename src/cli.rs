use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::types::RecordingKind;

/// albumsweep - Bulk rename and delete photo albums
#[derive(Parser)]
#[command(name = "albumsweep")]
#[command(about = "Lists photo albums, marks them by rule and renames or deletes them through the browser")]
#[command(version)]
pub struct Cli {
    /// Configuration file to use
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Dry-run mode: log every mouse and keyboard step instead of performing it.
    ///
    /// Nothing learned from a dry run is written back to the inventory, so a
    /// later real run still sees every planned album.
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive numbered menu (default)
    Menu,
    /// Replace the inventory with a fresh album listing
    Refresh,
    /// Propose titles for "Copy of" albums
    MarkRename,
    /// Flag albums matching the deletion rules
    MarkDelete,
    /// Record click positions for a delete or rename sequence
    Record {
        /// Which sequence to record (delete or rename)
        kind: RecordingKind,
    },
    /// Rename albums that have a proposed title
    Rename,
    /// Delete flagged albums
    Delete,
    /// Validate a configuration file
    Validate {
        /// Configuration file to validate (defaults to --config)
        file: Option<PathBuf>,
    },
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
