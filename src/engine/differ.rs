//! Change records and their display.

use rclone::LogRecord;

use crate::ui;

/// One file rclone would copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Path relative to the copy root
    pub object: String,
}

impl ChangeRecord {
    /// Records without an `object` key (progress, stats, summaries) are
    /// not changes.
    pub fn from_log(record: &LogRecord) -> Option<Self> {
        record.changed_object().map(|object| Self {
            object: object.to_string(),
        })
    }

    /// `"<from>/<object> -> <to>/<object>"`
    pub fn display_line(&self, from: &str, to: &str) -> String {
        format!("{from}/{obj} -> {to}/{obj}", obj = self.object)
    }
}

/// Display lines for every change in `records`, in log order.
pub fn change_lines(from: &str, to: &str, records: &[LogRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(ChangeRecord::from_log)
        .map(|change| change.display_line(from, to))
        .collect()
}

/// Print the change report ahead of the confirmation prompt.
pub fn display_changes(report: &str) {
    ui::header("Changes to be synced.");
    for line in report.lines() {
        match line.split_once(" -> ") {
            Some((from, to)) => ui::transfer(from, to),
            None => println!("  {line}"),
        }
    }
    println!();
}
