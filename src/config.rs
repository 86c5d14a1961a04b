use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::{self, LinkGuard};
use crate::error::ConfigError;
use crate::manifest::{self, Manifest};
use crate::platform;
use crate::schema::EntryConfig;

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Read and parse the entries of a config file.
pub fn load_entries(path: &Path) -> Result<Vec<EntryConfig>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_entries(&content, ConfigFormat::from_path(path)).map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_entries(content: &str, format: ConfigFormat) -> Result<Vec<EntryConfig>, String> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Yaml => {
            // An empty YAML document is an empty entry list
            if content.trim().is_empty() {
                return Ok(Vec::new());
            }
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        }
    }
}

/// Load the config file into manifests for the running platform.
///
/// Symlinks created while discovering files are registered with `links`.
pub fn load(path: &Path, links: &mut LinkGuard) -> Result<Vec<Manifest>> {
    let entries = load_entries(path)?;
    let platform = platform::current();
    log::debug!(
        "Loaded {} entries from {} for platform {}",
        entries.len(),
        path.display(),
        platform
    );

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            build_manifest(entry, &platform, links)
                .with_context(|| format!("Invalid entry #{} in {}", index + 1, path.display()))
        })
        .collect()
}

/// Resolve one entry into a manifest.
pub fn build_manifest(
    entry: &EntryConfig,
    platform: &str,
    links: &mut LinkGuard,
) -> Result<Manifest> {
    let source = platform::resolve(&entry.source, platform)?;
    let dest = platform::resolve(&entry.dest, platform)?;
    let filters = manifest::resolve_filters(&entry.filters, platform);

    let manifest = Manifest::new(source, dest, filters, entry.args.clone());
    log::debug!(
        "Manifest {} -> {} with {} filters",
        manifest.source(),
        manifest.dest(),
        manifest.filters().len()
    );
    let Some(discovery) = entry.discovery() else {
        return Ok(manifest);
    };

    let root = PathBuf::from(manifest.source());
    let files = discovery::discover(&discovery, &root, links)?;
    let manifest = manifest.with_files_from(discovery::create_manifest(&files)?);
    if let Some(list) = manifest.files_from() {
        log::debug!("Listed {} files in {}", files.len(), list.display());
    }
    Ok(manifest)
}
