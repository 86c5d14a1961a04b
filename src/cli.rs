use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::paths::ENV_CONFIG;

#[derive(Parser, Debug)]
#[command(name = "rstash")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Rclone wrapper for interactive and conditional backups", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = ENV_CONFIG, global = true)]
    pub config: Option<PathBuf>,

    /// Only print actions to be taken
    #[arg(short, long, global = true)]
    pub dry_run: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: log::LevelFilter,

    /// Print version information
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Upload files with Rclone
    Upload,

    /// Download files with Rclone
    Download,

    /// Download then upload files with Rclone
    Sync,
}
