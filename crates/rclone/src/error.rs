use thiserror::Error;

/// Errors raised while driving rclone.
#[derive(Debug, Error)]
pub enum Error {
    /// The rclone binary could not be spawned
    #[error("rclone not found - is it installed and on PATH?")]
    NotFound,

    /// rclone ran but exited unsuccessfully
    #[error("rclone exited with status {code}")]
    Failed {
        /// Exit code reported by the child (1 when killed by a signal)
        code: i32,
        /// Everything the child wrote to stderr
        stderr: String,
    },

    /// A `--use-json-log` line was not a JSON object
    #[error("malformed rclone log line {line:?}: {source}")]
    Protocol {
        /// The offending line, verbatim
        line: String,
        /// Underlying decode failure
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code this error should be propagated as, if it came from the child.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::Failed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Captured stderr of a failed run.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type for rclone operations
pub type Result<T> = std::result::Result<T, Error>;
