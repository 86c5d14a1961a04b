use crate::error::Result;
use crate::types::{CommandOutput, Invocation};

pub mod process;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

/// Backend trait for running rclone
///
/// This trait abstracts how rclone is executed, allowing us to:
/// - Shell out to the real binary
/// - Replay scripted output in tests
pub trait Backend: Send + Sync {
    /// Run one invocation to completion and capture its output.
    ///
    /// A non-zero exit is not an error at this level; the caller decides.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Get the default backend: the `rclone` binary on PATH.
pub fn default_backend() -> process::ProcessBackend {
    process::ProcessBackend::default()
}
