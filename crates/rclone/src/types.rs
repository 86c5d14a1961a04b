use std::process::Output;

/// Environment applied to every rclone child.
const BASE_ENV: &[(&str, &str)] = &[
    ("RCLONE_COPY_LINKS", "true"),
    ("RCLONE_CREATE_EMPTY_SRC_DIRS", "true"),
    ("RCLONE_HUMAN_READABLE", "true"),
    ("RCLONE_NO_UPDATE_DIR_MODTIME", "true"),
    ("RCLONE_NO_UPDATE_MODTIME", "true"),
];

/// How rclone is being asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report intended changes as JSON log lines on stderr, touch nothing
    DryRun,
    /// Perform the copy
    Apply,
}

impl Mode {
    /// Flags placed before the `copy` subcommand.
    fn leading_flags(self) -> &'static [&'static str] {
        match self {
            Mode::DryRun => &["--dry-run", "--use-json-log"],
            Mode::Apply => &["--verbose"],
        }
    }

    /// Variables layered over [`BASE_ENV`] for this mode.
    fn extra_env(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Mode::DryRun => &[("RCLONE_PROGRESS", "false")],
            // No parallel chunk writers on the same destination file
            Mode::Apply => &[("RCLONE_MULTI_THREAD_STREAMS", "0")],
        }
    }
}

/// A single `rclone copy --update` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    /// Filters, extra flags and the trailing `source dest` pair
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(mode: Mode, args: &[String]) -> Self {
        Self {
            mode,
            args: args.to_vec(),
        }
    }

    /// Full argument vector handed to the rclone binary.
    pub fn command_args(&self) -> Vec<String> {
        self.mode
            .leading_flags()
            .iter()
            .chain(["copy", "--update"].iter())
            .map(|s| (*s).to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Environment variables set on the child only.
    pub fn env(&self) -> Vec<(&'static str, &'static str)> {
        BASE_ENV
            .iter()
            .chain(self.mode.extra_env())
            .copied()
            .collect()
    }

    /// Human-readable command line for logging.
    pub fn display(&self, program: &str) -> String {
        let mut parts = vec![program.to_string()];
        parts.extend(self.command_args());
        parts.join(" ")
    }
}

/// Captured result of running rclone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the child was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}
