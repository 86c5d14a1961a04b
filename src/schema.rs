//! On-disk configuration shape.
//!
//! A config file is a sequence of entries, each describing one
//! source/destination pair:
//!
//! ```yaml
//! - source: ~/Documents
//!   dest:
//!     macos: icloud:Documents
//!     default: gdrive:Documents
//!   filters:
//!     - "- .DS_Store"
//!     - "macos - /Library/**"
//!   args: ["--max-age", "1y"]
//!
//! - source: ~/
//!   dest: remote:dotfiles
//!   excludes: ['.*\.swp$']
//!   paths:
//!     - .config/fish
//!     - path: .ssh
//!       alternates: [~/Dropbox/ssh]
//!       includes: ['^config', '^known_hosts']
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A path that is either the same everywhere or chosen per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathOption {
    Literal(String),
    /// Keys are platform names (`macos`, `linux`, `windows`, ...), `unix`
    /// or `default`
    PerPlatform(BTreeMap<String, String>),
}

/// One configured synchronization unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    pub source: PathOption,
    pub dest: PathOption,

    /// Ordered rclone filter rules, optionally platform-conditioned
    #[serde(default)]
    pub filters: Vec<String>,

    /// Extra rclone flags passed through verbatim
    #[serde(default)]
    pub args: Vec<String>,

    /// Files to discover under `source`; when present the copy is
    /// restricted to the discovered list
    #[serde(default)]
    pub paths: Vec<PathEntry>,

    /// Regexes a file name must match (at its start) to be discovered
    #[serde(default)]
    pub includes: Vec<String>,

    /// Regexes that reject a file name
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl EntryConfig {
    /// Discovery settings, if this entry lists any paths.
    pub fn discovery(&self) -> Option<DiscoveryConfig> {
        if self.paths.is_empty() {
            return None;
        }
        Some(DiscoveryConfig {
            paths: self.paths.clone(),
            includes: self.includes.clone(),
            excludes: self.excludes.clone(),
        })
    }
}

/// Root-level discovery settings for one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub paths: Vec<PathEntry>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

/// A path to discover, relative to the entry's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    Simple(String),
    Detailed(PathSpec),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSpec {
    pub path: String,
    /// Candidates to link `path` to when it does not exist, first match wins
    #[serde(default)]
    pub alternates: Vec<String>,
    /// Replace the root includes for this path
    #[serde(default)]
    pub includes: Vec<String>,
    /// Added to the root excludes for this path
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl PathEntry {
    pub fn path(&self) -> &str {
        match self {
            PathEntry::Simple(path) => path,
            PathEntry::Detailed(spec) => &spec.path,
        }
    }

    pub fn alternates(&self) -> &[String] {
        match self {
            PathEntry::Simple(_) => &[],
            PathEntry::Detailed(spec) => &spec.alternates,
        }
    }

    pub fn includes(&self) -> &[String] {
        match self {
            PathEntry::Simple(_) => &[],
            PathEntry::Detailed(spec) => &spec.includes,
        }
    }

    pub fn excludes(&self) -> &[String] {
        match self {
            PathEntry::Simple(_) => &[],
            PathEntry::Detailed(spec) => &spec.excludes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
- source: ~/Documents
  dest:
    macos: icloud:Documents
    default: gdrive:Documents
  filters:
    - "- .DS_Store"
  args: ["--max-age", "1y"]
- source: ~/
  dest: remote:dotfiles
  excludes: ['.*\.swp$']
  paths:
    - .config/fish
    - path: .ssh
      alternates: [~/Dropbox/ssh]
      includes: ['^config']
"#;

    #[test]
    fn parses_example_config() {
        let entries: Vec<EntryConfig> = serde_yaml::from_str(EXAMPLE).unwrap();
        assert_eq!(entries.len(), 2);

        let docs = &entries[0];
        assert_eq!(docs.source, PathOption::Literal("~/Documents".to_string()));
        match &docs.dest {
            PathOption::PerPlatform(map) => {
                assert_eq!(map["macos"], "icloud:Documents");
                assert_eq!(map["default"], "gdrive:Documents");
            }
            other => panic!("expected per-platform dest, got {other:?}"),
        }
        assert_eq!(docs.filters, vec!["- .DS_Store"]);
        assert_eq!(docs.args, vec!["--max-age", "1y"]);
        assert!(docs.discovery().is_none());

        let dots = entries[1].discovery().unwrap();
        assert_eq!(dots.excludes, vec![r".*\.swp$"]);
        assert_eq!(dots.paths[0], PathEntry::Simple(".config/fish".to_string()));
        assert_eq!(dots.paths[1].path(), ".ssh");
        assert_eq!(dots.paths[1].alternates(), ["~/Dropbox/ssh"]);
        assert_eq!(dots.paths[1].includes(), ["^config"]);
        assert!(dots.paths[1].excludes().is_empty());
    }

    #[test]
    fn json_is_schema_equivalent() {
        let json = r#"[{"source": "/s", "dest": {"unix": "/d", "default": "D:/d"}, "filters": ["+ /keep"]}]"#;
        let entries: Vec<EntryConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].source, PathOption::Literal("/s".to_string()));
        assert_eq!(entries[0].filters, vec!["+ /keep"]);
        assert!(entries[0].args.is_empty());
    }

    #[test]
    fn rejects_unknown_fields() {
        let yaml = "- source: /s\n  dest: /d\n  filter: ['- x']\n";
        assert!(serde_yaml::from_str::<Vec<EntryConfig>>(yaml).is_err());
    }

    #[test]
    fn requires_source_and_dest() {
        let yaml = "- source: /s\n";
        assert!(serde_yaml::from_str::<Vec<EntryConfig>>(yaml).is_err());
    }
}
