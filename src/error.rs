//! Error taxonomy for rstash.
//!
//! Engine failures live in [`rclone::Error`]; everything that is the
//! operator's configuration's fault is a [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("no path for platform '{platform}' among [{available}] and no 'default' entry")]
    NoPlatformMatch { platform: String, available: String },

    #[error("path '{path}' is outside the source {root}")]
    OutsideSource { path: String, root: PathBuf },

    #[error("invalid {kind} pattern '{pattern}': {source}")]
    Pattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A termination signal arrived while a command was running.
#[derive(Debug, Error)]
#[error("interrupted")]
pub struct Interrupted;
