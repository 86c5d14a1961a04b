//! File discovery for `--files-from` manifests.
//!
//! Each configured path is resolved under the entry's source root and its
//! immediate children are filtered by include/exclude regexes. Patterns
//! are anchored at the start of the file name only, so `^a` keeps
//! `abc.log`: a pattern matching a prefix of the name keeps the whole
//! file. The union of kept files is written, sorted, to a temporary list
//! file for rclone.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::TempPath;
use walkdir::WalkDir;

use crate::error::ConfigError;
use crate::paths;
use crate::schema::{DiscoveryConfig, PathEntry};

// ============================================================================
// Link Guard
// ============================================================================

/// Symlinks created in place of missing paths.
///
/// Every link, and every parent directory created to hold one, is removed
/// when the guard is dropped, whichever way the owning scope exits.
#[derive(Debug, Default)]
pub struct LinkGuard {
    links: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl LinkGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `link` pointing at `target` and track it for removal.
    pub fn link(&mut self, target: &Path, link: &Path) -> Result<()> {
        if let Some(parent) = link.parent() {
            let missing: Vec<PathBuf> = parent
                .ancestors()
                .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
                .map(Path::to_path_buf)
                .collect();
            // Tracked before creation so a partial failure is cleaned up too
            self.dirs.extend(missing);
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        create_symlink(target, link).with_context(|| {
            format!(
                "Failed to link {} -> {}",
                link.display(),
                target.display()
            )
        })?;
        log::info!("Linked {} -> {}", link.display(), target.display());
        self.links.push(link.to_path_buf());
        Ok(())
    }

    pub fn links(&self) -> &[PathBuf] {
        &self.links
    }
}

impl Drop for LinkGuard {
    fn drop(&mut self) {
        for link in self.links.drain(..).rev() {
            match remove_symlink(&link) {
                Ok(()) => log::debug!("Removed link {}", link.display()),
                Err(e) => log::warn!("Could not remove link {}: {}", link.display(), e),
            }
        }

        // Deepest first; a directory that gained other content stays
        self.dirs
            .sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in self.dirs.drain(..) {
            match fs::remove_dir(&dir) {
                Ok(()) => log::debug!("Removed directory {}", dir.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Could not remove directory {}: {}", dir.display(), e),
            }
        }
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(unix)]
fn remove_symlink(link: &Path) -> std::io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_symlink(link: &Path) -> std::io::Result<()> {
    // Directory symlinks on Windows are removed like directories
    fs::remove_file(link).or_else(|_| fs::remove_dir(link))
}

// ============================================================================
// Rules
// ============================================================================

/// Compiled include/exclude patterns for one path entry.
#[derive(Debug)]
struct Rules {
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl Rules {
    /// Entry includes replace root includes (match-all when both are
    /// empty); entry excludes add to root excludes.
    fn for_entry(config: &DiscoveryConfig, entry: &PathEntry) -> Result<Self, ConfigError> {
        let includes = if !entry.includes().is_empty() {
            compile("include", entry.includes())?
        } else if !config.includes.is_empty() {
            compile("include", &config.includes)?
        } else {
            compile("include", &[String::new()])?
        };

        let mut excludes = compile("exclude", &config.excludes)?;
        excludes.extend(compile("exclude", entry.excludes())?);

        Ok(Self { includes, excludes })
    }

    fn keeps(&self, name: &str) -> bool {
        self.includes.iter().any(|re| re.is_match(name))
            && !self.excludes.iter().any(|re| re.is_match(name))
    }
}

/// Compile patterns anchored at the start of the subject.
fn compile(kind: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})")).map_err(|source| ConfigError::Pattern {
                kind,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

// ============================================================================
// Discovery
// ============================================================================

/// Discover files under `source_root`, returned relative to it, sorted and
/// de-duplicated.
///
/// Missing paths with an existing alternate are linked into place through
/// `links`; missing paths without one are skipped. A relative root is
/// resolved against the working directory first so links never dangle.
pub fn discover(
    config: &DiscoveryConfig,
    source_root: &Path,
    links: &mut LinkGuard,
) -> Result<Vec<PathBuf>> {
    let source_root = std::path::absolute(source_root)
        .with_context(|| format!("Failed to resolve {}", source_root.display()))?;
    let source_root = source_root.as_path();
    let mut files = BTreeSet::new();

    for entry in &config.paths {
        let rules = Rules::for_entry(config, entry)?;
        let path = entry_path(source_root, entry.path())?;

        if !path.exists() && !link_alternate(entry, &path, source_root, links)? {
            log::info!("Skipping missing path {}", path.display());
            continue;
        }

        for (name, file) in children(&path)? {
            if !rules.keeps(&name) {
                log::trace!("Filtered out {}", file.display());
            } else if let Ok(relative) = file.strip_prefix(source_root) {
                files.insert(relative.to_path_buf());
            } else {
                log::warn!("Skipping {} outside {}", file.display(), source_root.display());
            }
        }
    }

    log::debug!(
        "Discovered {} files under {}",
        files.len(),
        source_root.display()
    );
    Ok(files.into_iter().collect())
}

/// Resolve a configured path under `source_root`.
///
/// Entries must stay inside the root: rclone reads `--files-from` lines
/// relative to the copy root.
fn entry_path(source_root: &Path, entry: &str) -> Result<PathBuf, ConfigError> {
    let path = source_root.join(paths::expand(entry));
    let escapes = Path::new(entry)
        .components()
        .any(|part| part == Component::ParentDir);
    if escapes || !path.starts_with(source_root) {
        return Err(ConfigError::OutsideSource {
            path: entry.to_string(),
            root: source_root.to_path_buf(),
        });
    }
    Ok(path)
}

/// Link `path` to the first existing alternate. Returns whether a link was
/// made.
fn link_alternate(
    entry: &PathEntry,
    path: &Path,
    source_root: &Path,
    links: &mut LinkGuard,
) -> Result<bool> {
    let Some(target) = entry
        .alternates()
        .iter()
        .map(|alt| source_root.join(paths::expand(alt)))
        .find(|alt| alt.exists())
    else {
        return Ok(false);
    };

    // A dangling symlink already occupies the configured location
    if path.symlink_metadata().is_ok() {
        log::warn!(
            "{} is a broken link, not replacing it with {}",
            path.display(),
            target.display()
        );
        return Ok(false);
    }

    links.link(&target, path)?;
    Ok(true)
}

/// Immediate children of `path` as `(file name, full path)`, following a
/// symlinked `path` itself. A plain file stands for itself.
fn children(path: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !path.is_dir() {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![(name, path.to_path_buf())]);
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_root_links(true)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read {}", path.display()))?;
        children.push((
            entry.file_name().to_string_lossy().into_owned(),
            entry.path().to_path_buf(),
        ));
    }
    Ok(children)
}

// ============================================================================
// Manifest File
// ============================================================================

/// Write `files` one per line to a fresh temporary file.
///
/// The returned handle owns the file: it is deleted when dropped, so the
/// caller must keep it alive for as long as rclone needs the list.
pub fn create_manifest(files: &[PathBuf]) -> Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix("rstash-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create manifest file")?;

    for path in files {
        writeln!(file, "{}", paths::to_slash(path)).context("Failed to write manifest file")?;
    }
    file.flush().context("Failed to write manifest file")?;

    Ok(file.into_temp_path())
}
