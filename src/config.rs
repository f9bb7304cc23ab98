//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration parsed from the command line.
#[derive(Clone, Debug, Parser, PartialEq, Eq)]
#[command(version, about)]
pub struct Config {
    /// Directory scanned for `level*.txt` files.
    #[arg(short, long, default_value = ".")]
    pub levels_dir: PathBuf,
    /// Directory holding the player history and level statistics files.
    #[arg(short, long, default_value = ".")]
    pub data_dir: PathBuf,
    /// File receiving log output; the level is set through `SOKOTUINE_LOG`.
    #[arg(long, default_value = "sokotuine.log")]
    pub log_file: PathBuf,
}
