//! Subcommand implementations.

pub mod transfer;

pub use transfer::{Outcome, download, sync, upload};
