//! Backend that spawns the rclone binary.

use std::ffi::OsString;
use std::process::{Command, Stdio};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::types::{CommandOutput, Invocation};

use super::Backend;

/// Runs rclone as a blocking child process with captured output.
///
/// No timeout is applied: a hung rclone hangs the caller.
pub struct ProcessBackend {
    program: OsString,
}

impl ProcessBackend {
    /// Use a specific rclone executable instead of looking it up on PATH.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ProcessBackend {
    fn default() -> Self {
        Self::with_program("rclone")
    }
}

impl Backend for ProcessBackend {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        log::debug!(
            "Running command '{}'.",
            invocation.display(&self.program.to_string_lossy())
        );

        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(invocation.command_args())
            .envs(invocation.env())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::NotFound
                } else {
                    Error::Io(e)
                }
            })?;
        log::debug!(
            "Ran command in {:.4e} seconds.",
            start.elapsed().as_secs_f64()
        );

        Ok(output.into())
    }
}
