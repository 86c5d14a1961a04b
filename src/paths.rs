//! Centralized path resolution for rstash
//!
//! # Config File Resolution Priority
//!
//! 1. `-c/--config` flag
//! 2. `RSTASH_CONFIG` environment variable (wired through clap)
//! 3. Platform default directory, first existing of `config.yaml`,
//!    `config.yml`, `config.json`:
//!    - macOS: `~/Library/Application Support/rstash`
//!    - Windows: `~/AppData/Roaming/rstash`
//!    - elsewhere: `~/.config/rstash`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config file override
pub const ENV_CONFIG: &str = "RSTASH_CONFIG";

const APP_NAME: &str = "rstash";

/// Candidate file names inside the config directory, in lookup order
const CONFIG_NAMES: &[&str] = &["config.yaml", "config.yml", "config.json"];

/// Resolve the config file from an explicit path (flag or env) or the
/// platform default.
pub fn config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let path = expand(&path.to_string_lossy());
        log::debug!("Using explicit config file: {}", path.display());
        return Ok(path);
    }

    let dir = config_dir()?;
    let path = find_config_in(&dir);
    log::debug!("Using default config file: {}", path.display());
    Ok(path)
}

/// Get the platform default config directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(config_dir_for(&home, &crate::platform::current()))
}

fn config_dir_for(home: &Path, platform: &str) -> PathBuf {
    match platform {
        "macos" => home
            .join("Library")
            .join("Application Support")
            .join(APP_NAME),
        "windows" => home.join("AppData").join("Roaming").join(APP_NAME),
        _ => home.join(".config").join(APP_NAME),
    }
}

/// First existing config file in `dir`, or `config.yaml` if none exists.
fn find_config_in(dir: &Path) -> PathBuf {
    CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .unwrap_or_else(|| dir.join(CONFIG_NAMES[0]))
}

/// Expand a leading `~` in a path string.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expand `~` and normalize to a forward-slash path.
///
/// Repeated separators, `.` components and trailing slashes are dropped.
/// Paths are not made absolute: rclone remote specs such as `remote:dir`
/// must pass through untouched.
pub fn normalize(path: &str) -> String {
    let expanded = shellexpand::tilde(path);
    let slashed = if cfg!(windows) {
        expanded.replace('\\', "/")
    } else {
        expanded.into_owned()
    };

    let absolute = slashed.starts_with('/');
    let joined = slashed
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");

    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if cfg!(windows) {
        rendered.replace('\\', "/")
    } else {
        rendered.into_owned()
    }
}

// ============================================================================
// Tests
// ============================================================================
