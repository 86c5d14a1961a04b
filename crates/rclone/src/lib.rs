//! # rclone
//!
//! A small typed wrapper around the [rclone](https://rclone.org) CLI.
//!
//! The crate never reimplements any transfer logic. It only:
//!
//! - runs `rclone copy --update` in dry-run mode with `--use-json-log` and
//!   decodes the structured log lines into [`LogRecord`]s
//! - runs the same copy for real and reports failure with the child's exit
//!   code and stderr intact
//!
//! ## Example
//!
//! ```no_run
//! use rclone::Client;
//!
//! let client = Client::new();
//! let args = vec!["/home/me/docs".to_string(), "remote:docs".to_string()];
//!
//! let records = client.dry_run(&args).expect("dry run failed");
//! for object in records.iter().filter_map(|r| r.changed_object()) {
//!     println!("would copy {object}");
//! }
//!
//! client.copy(&args).expect("copy failed");
//! ```
//!
//! ## Backends
//!
//! - `process` (default): spawns the `rclone` binary
//! - `scripted` (feature `testing`): replays canned output for tests

#![deny(unsafe_code)]

pub mod backend;
pub mod error;
pub mod jsonlog;
pub mod types;

pub use error::{Error, Result};
pub use jsonlog::LogRecord;
pub use types::{CommandOutput, Invocation, Mode};

use backend::Backend;

/// High-level client issuing dry-run and copy invocations.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create a client that runs the `rclone` binary found on PATH.
    pub fn new() -> Self {
        Self {
            backend: Box::new(backend::default_backend()),
        }
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Dry-run a copy and return every structured log record it emitted.
    ///
    /// Fails with [`Error::Failed`] on a non-zero exit and with
    /// [`Error::Protocol`] if any log line is not JSON.
    pub fn dry_run(&self, args: &[String]) -> Result<Vec<LogRecord>> {
        let output = self.execute(Mode::DryRun, args)?;
        jsonlog::parse_stream(&output.stderr)
    }

    /// Perform a copy.
    pub fn copy(&self, args: &[String]) -> Result<()> {
        let output = self.execute(Mode::Apply, args)?;
        log::trace!("rclone output: {}", output.stderr.trim());
        Ok(())
    }

    fn execute(&self, mode: Mode, args: &[String]) -> Result<CommandOutput> {
        let output = self.backend.run(&Invocation::new(mode, args))?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::Failed {
                code: output.code.unwrap_or(1),
                stderr: output.stderr,
            })
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
