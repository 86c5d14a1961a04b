//! Transfer engine for rstash
//!
//! The engine orchestrates:
//! 1. Planning - Dry-run every manifest and collect pending changes
//! 2. Diffing - Render rclone's log records as `from -> to` lines
//! 3. Confirming - Ask the operator before anything is written
//! 4. Executing - Re-run rclone for real, one manifest at a time

pub mod confirm;
pub mod differ;
pub mod executor;
pub mod planner;

pub use confirm::{ConfirmationGate, TerminalPrompt};
pub use executor::apply_changes;
pub use planner::{ChangePlan, combined_report, plan_changes};
