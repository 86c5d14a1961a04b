//! Manifest model: one source/destination pair and its rclone arguments.

use std::fmt;
use std::path::Path;

use tempfile::TempPath;

use crate::paths;
use crate::platform;

/// Which way files flow between a manifest's source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// source → dest
    Upload,
    /// dest → source
    Download,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upload => write!(f, "upload"),
            Direction::Download => write!(f, "download"),
        }
    }
}

/// A configured filter rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    /// Passed to rclone verbatim (`+ /keep`, `- *.tmp`, `!`)
    Rule(String),
    /// `<platform> <rule>`: only applies on the named platform
    Conditional { platform: String, rule: String },
}

impl FilterSpec {
    pub fn parse(spec: &str) -> Self {
        let trimmed = spec.trim_start();
        if trimmed.starts_with(['+', '-', '!']) {
            return FilterSpec::Rule(spec.to_string());
        }
        match trimmed.split_once(char::is_whitespace) {
            Some((platform, rule)) => FilterSpec::Conditional {
                platform: platform.to_string(),
                rule: rule.trim_start().to_string(),
            },
            None => FilterSpec::Rule(spec.to_string()),
        }
    }

    /// The rule to hand rclone on `platform`, or `None` if it is dropped.
    pub fn resolve(&self, platform: &str) -> Option<&str> {
        match self {
            FilterSpec::Rule(rule) => Some(rule),
            FilterSpec::Conditional {
                platform: wanted,
                rule,
            } => platform::matches(wanted, platform).then_some(rule.as_str()),
        }
    }
}

/// Resolve raw filter strings for `platform`, keeping their order.
pub fn resolve_filters(specs: &[String], platform: &str) -> Vec<String> {
    specs
        .iter()
        .map(|spec| FilterSpec::parse(spec))
        .filter_map(|spec| spec.resolve(platform).map(str::to_string))
        .collect()
}

/// One synchronization unit.
///
/// Source and destination are resolved once; the argument lists for both
/// directions are computed at construction and never change.
#[derive(Debug)]
pub struct Manifest {
    source: String,
    dest: String,
    filters: Vec<String>,
    extra_args: Vec<String>,
    files_from: Option<TempPath>,
    upload_args: Vec<String>,
    download_args: Vec<String>,
}

impl Manifest {
    /// `filters` must already be resolved for the running platform.
    pub fn new(
        source: impl Into<String>,
        dest: impl Into<String>,
        filters: Vec<String>,
        extra_args: Vec<String>,
    ) -> Self {
        let mut manifest = Self {
            source: source.into(),
            dest: dest.into(),
            filters,
            extra_args,
            files_from: None,
            upload_args: Vec::new(),
            download_args: Vec::new(),
        };
        manifest.build_args();
        manifest
    }

    /// Restrict transfers to the files listed in `list`.
    ///
    /// The manifest takes ownership of the list file; it is deleted when
    /// the manifest is dropped.
    pub fn with_files_from(mut self, list: TempPath) -> Self {
        self.files_from = Some(list);
        self.build_args();
        self
    }

    fn build_args(&mut self) {
        let mut common: Vec<String> = self
            .filters
            .iter()
            .flat_map(|rule| ["--filter".to_string(), rule.clone()])
            .collect();
        if let Some(list) = &self.files_from {
            common.push("--files-from".to_string());
            common.push(paths::to_slash(list));
        }
        common.extend(self.extra_args.iter().cloned());

        self.upload_args = common
            .iter()
            .cloned()
            .chain([self.source.clone(), self.dest.clone()])
            .collect();
        self.download_args = common
            .into_iter()
            .chain([self.dest.clone(), self.source.clone()])
            .collect();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn files_from(&self) -> Option<&Path> {
        self.files_from.as_deref()
    }

    /// Arguments for `rclone copy` in the given direction.
    pub fn args(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Upload => &self.upload_args,
            Direction::Download => &self.download_args,
        }
    }

    /// Effective `(from, to)` for the given direction.
    pub fn endpoints(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::Upload => (&self.source, &self.dest),
            Direction::Download => (&self.dest, &self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn upload_args_interleave_filters() {
        let m = Manifest::new("/s", "/d", strings(&["+ /keep", "- /drop"]), vec![]);
        assert_eq!(
            m.args(Direction::Upload),
            strings(&["--filter", "+ /keep", "--filter", "- /drop", "/s", "/d"])
        );
    }

    #[test]
    fn download_args_swap_endpoints() {
        let m = Manifest::new("/s", "/d", strings(&["+ /keep", "- /drop"]), vec![]);
        assert_eq!(
            m.args(Direction::Download),
            strings(&["--filter", "+ /keep", "--filter", "- /drop", "/d", "/s"])
        );
    }

    #[test]
    fn extra_args_follow_filters() {
        let m = Manifest::new(
            "/s",
            "remote:d",
            strings(&["- *.tmp"]),
            strings(&["--max-age", "1y"]),
        );
        assert_eq!(
            m.args(Direction::Upload),
            strings(&["--filter", "- *.tmp", "--max-age", "1y", "/s", "remote:d"])
        );
    }

    #[test]
    fn args_are_stable_across_calls() {
        let m = Manifest::new("/s", "/d", strings(&["- x"]), vec![]);
        let first = m.args(Direction::Upload).to_vec();
        assert_eq!(m.args(Direction::Upload), first.as_slice());
    }

    #[test]
    fn endpoints_follow_direction() {
        let m = Manifest::new("/s", "dest:", vec![], vec![]);
        assert_eq!(m.endpoints(Direction::Upload), ("/s", "dest:"));
        assert_eq!(m.endpoints(Direction::Download), ("dest:", "/s"));
    }

    #[test]
    fn files_from_sits_between_filters_and_extra_args() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a.txt").unwrap();
        let list = file.into_temp_path();
        let list_path = paths::to_slash(&list);

        let m = Manifest::new("/s", "/d", strings(&["- x"]), strings(&["--fast-list"]))
            .with_files_from(list);
        assert_eq!(
            m.args(Direction::Upload),
            strings(&["--filter", "- x", "--files-from", list_path.as_str(), "--fast-list", "/s", "/d"])
        );
        assert!(m.files_from().unwrap().exists());
    }

    #[test]
    fn files_from_list_removed_on_drop() {
        let list = tempfile::NamedTempFile::new().unwrap().into_temp_path();
        let path = list.to_path_buf();
        let m = Manifest::new("/s", "/d", vec![], vec![]).with_files_from(list);
        assert!(path.exists());
        drop(m);
        assert!(!path.exists());
    }

    #[test]
    fn filter_spec_literal_rules() {
        assert_eq!(
            FilterSpec::parse("+ /keep"),
            FilterSpec::Rule("+ /keep".to_string())
        );
        assert_eq!(FilterSpec::parse("- *.o"), FilterSpec::Rule("- *.o".to_string()));
        assert_eq!(FilterSpec::parse("!"), FilterSpec::Rule("!".to_string()));
    }

    #[test]
    fn filter_spec_platform_conditioned() {
        let spec = FilterSpec::parse("macos - /Library/**");
        assert_eq!(
            spec,
            FilterSpec::Conditional {
                platform: "macos".to_string(),
                rule: "- /Library/**".to_string(),
            }
        );
        assert_eq!(spec.resolve("macos"), Some("- /Library/**"));
        assert_eq!(spec.resolve("linux"), None);
    }

    #[test]
    fn resolve_filters_drops_other_platforms_and_keeps_order() {
        let specs = strings(&[
            "- a",
            "windows - /AppData/**",
            "unix - /.cache/**",
            "+ b",
        ]);
        assert_eq!(
            resolve_filters(&specs, "linux"),
            strings(&["- a", "- /.cache/**", "+ b"])
        );
        assert_eq!(
            resolve_filters(&specs, "windows"),
            strings(&["- a", "- /AppData/**", "+ b"])
        );
    }
}
