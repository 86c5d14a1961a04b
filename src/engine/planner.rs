//! Change planning: dry-run each manifest and collect what would be copied.

use anyhow::Result;

use crate::manifest::{Direction, Manifest};
use crate::progress;
use crate::signals;
use crate::ui;

use super::differ::change_lines;

/// Pending changes for one direction.
#[derive(Debug)]
pub struct ChangePlan<'a> {
    pub direction: Direction,
    /// Manifests with at least one change, in config order
    pub manifests: Vec<&'a Manifest>,
    /// Display lines across all retained manifests, in processing order
    pub changes: Vec<String>,
}

impl<'a> ChangePlan<'a> {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            manifests: Vec::new(),
            changes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    /// Newline-separated change report.
    pub fn report(&self) -> String {
        self.changes.join("\n")
    }
}

/// Dry-run every manifest in `direction`.
///
/// The first engine failure aborts planning and is returned as is.
pub fn plan_changes<'a>(
    client: &rclone::Client,
    manifests: &'a [Manifest],
    direction: Direction,
) -> Result<ChangePlan<'a>> {
    let mut plan = ChangePlan::new(direction);

    for manifest in manifests {
        signals::check()?;

        let (from, to) = manifest.endpoints(direction);
        let spinner = progress::spinner(&format!(
            "Checking {} -> {}",
            ui::truncate_path(from, 40),
            ui::truncate_path(to, 40)
        ));
        let records = client.dry_run(manifest.args(direction));
        progress::finish_clear(&spinner);

        let lines = change_lines(from, to, &records?);
        log::debug!("{} pending {} changes for {}", lines.len(), direction, from);
        if !lines.is_empty() {
            plan.manifests.push(manifest);
            plan.changes.extend(lines);
        }
    }

    Ok(plan)
}

/// Concatenate reports of several plans, skipping empty ones.
pub fn combined_report(plans: &[ChangePlan<'_>]) -> String {
    plans
        .iter()
        .filter(|plan| !plan.is_empty())
        .map(ChangePlan::report)
        .collect::<Vec<_>>()
        .join("\n")
}
