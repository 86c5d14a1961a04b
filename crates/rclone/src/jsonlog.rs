//! Parsing of rclone's `--use-json-log` output.
//!
//! Every non-blank stderr line is one JSON object. Lines that describe an
//! object (a file rclone would copy) carry an `object` key; progress,
//! summary and stats lines do not.

use serde::Deserialize;

use crate::error::{Error, Result};

/// One structured log line emitted by rclone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    /// Path of the affected object, relative to the copy root
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub size: Option<i64>,
}

impl LogRecord {
    /// Object path if this record describes a change.
    pub fn changed_object(&self) -> Option<&str> {
        self.object.as_deref()
    }
}

/// Parse a single log line.
pub fn parse_line(line: &str) -> Result<LogRecord> {
    serde_json::from_str(line).map_err(|source| Error::Protocol {
        line: line.to_string(),
        source,
    })
}

/// Parse a whole captured stream, one record per non-blank line.
///
/// Fails on the first line that is not a JSON object.
pub fn parse_stream(stream: &str) -> Result<Vec<LogRecord>> {
    stream
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}
