//! Termination signal handling.
//!
//! SIGINT and SIGTERM only raise a flag. Commands poll it between engine
//! calls and unwind with [`Interrupted`], so symlinks and manifest files
//! are cleaned up by their guards on the way out.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Interrupted;

static FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

fn flag() -> &'static Arc<AtomicBool> {
    FLAG.get_or_init(|| Arc::new(AtomicBool::new(false)))
}

/// Route SIGINT/SIGTERM into the interrupt flag.
#[cfg(unix)]
pub fn install() -> std::io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(flag()))?;
    }
    log::debug!("Installed SIGINT/SIGTERM handlers");
    Ok(())
}

/// Console interrupts keep their default behaviour on other platforms.
#[cfg(not(unix))]
pub fn install() -> std::io::Result<()> {
    Ok(())
}

pub fn interrupted() -> bool {
    flag().load(Ordering::Relaxed)
}

/// Fail with [`Interrupted`] once a signal has arrived.
pub fn check() -> Result<(), Interrupted> {
    if interrupted() { Err(Interrupted) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_interrupted_by_default() {
        assert!(!interrupted());
        assert!(check().is_ok());
    }
}
