//! The `upload`, `download` and `sync` commands.
//!
//! Each runs the same state machine: load the config, plan every
//! direction with a dry run, stop when nothing would change, show the
//! report, and only copy once the operator agreed.

use anyhow::{Context as AnyhowContext, Result};
use std::fs;
use std::path::Path;

use crate::Context;
use crate::config;
use crate::discovery::LinkGuard;
use crate::engine::{self, ChangePlan, ConfirmationGate};
use crate::manifest::{Direction, Manifest};
use crate::ui;

/// How a transfer command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every dry run came back empty; nothing was asked
    NoChanges,
    /// Report printed, `--dry-run` stopped before the prompt
    DryRun,
    /// The operator refused
    Declined,
    /// Changes copied for this many manifest/direction pairs
    Applied { manifests: usize },
}

pub fn upload(
    ctx: &Context,
    client: &rclone::Client,
    gate: &mut dyn ConfirmationGate,
) -> Result<Outcome> {
    run(ctx, client, gate, &[Direction::Upload])
}

pub fn download(
    ctx: &Context,
    client: &rclone::Client,
    gate: &mut dyn ConfirmationGate,
) -> Result<Outcome> {
    run(ctx, client, gate, &[Direction::Download])
}

/// Download first, then upload.
pub fn sync(
    ctx: &Context,
    client: &rclone::Client,
    gate: &mut dyn ConfirmationGate,
) -> Result<Outcome> {
    run(ctx, client, gate, &[Direction::Download, Direction::Upload])
}

fn run(
    ctx: &Context,
    client: &rclone::Client,
    gate: &mut dyn ConfirmationGate,
    directions: &[Direction],
) -> Result<Outcome> {
    // Dropped after `manifests`, so links outlive every engine call
    let mut links = LinkGuard::new();
    let manifests = config::load(&ctx.config_path, &mut links)?;
    log::info!(
        "Loaded {} manifests from {}",
        manifests.len(),
        ctx.config_path.display()
    );
    log::debug!("{} alternate links in place", links.links().len());

    if directions.contains(&Direction::Download) {
        create_sources(&manifests)?;
    }

    let plans = directions
        .iter()
        .map(|&direction| engine::plan_changes(client, &manifests, direction))
        .collect::<Result<Vec<_>>>()?;

    if plans.iter().all(ChangePlan::is_empty) {
        ui::info("No changes to sync.");
        return Ok(Outcome::NoChanges);
    }

    let report = engine::combined_report(&plans);
    if ctx.dry_run {
        engine::differ::display_changes(&report);
        ui::dim("Dry run, nothing copied.");
        return Ok(Outcome::DryRun);
    }

    if !engine::confirm::confirm(gate, &report)? {
        ui::warn("Sync declined.");
        return Ok(Outcome::Declined);
    }

    let mut applied = 0;
    for plan in &plans {
        applied += engine::apply_changes(client, &plan.manifests, plan.direction)?;
    }
    ui::success(&format!("Synced {applied} manifests."));
    Ok(Outcome::Applied { manifests: applied })
}

/// Local sources must exist before rclone can copy into them.
fn create_sources(manifests: &[Manifest]) -> Result<()> {
    for manifest in manifests {
        let source = Path::new(manifest.source());
        if !source.is_dir() {
            fs::create_dir_all(source)
                .with_context(|| format!("Failed to create {}", source.display()))?;
            log::debug!("Created {}", source.display());
        }
    }
    Ok(())
}
