//! Platform detection and per-platform path selection.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::paths;
use crate::schema::PathOption;

/// Normalized name of the running platform (`macos`, `linux`, `windows`, ...).
pub fn current() -> String {
    normalize(std::env::consts::OS)
}

/// Lowercase a platform name and apply the `darwin` → `macos` alias.
pub fn normalize(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    if lower == "darwin" {
        "macos".to_string()
    } else {
        lower
    }
}

/// Whether a platform key from the config applies to `platform`.
///
/// `unix` covers every platform except Windows.
pub fn matches(key: &str, platform: &str) -> bool {
    let key = normalize(key);
    key == platform || (key == "unix" && platform != "windows")
}

/// Pick the most specific option for `platform`.
///
/// Exact platform key, then `unix` on anything but Windows, then `default`.
pub fn select<'a>(options: &'a BTreeMap<String, String>, platform: &str) -> Option<&'a str> {
    options
        .get(platform)
        .or_else(|| {
            if platform == "windows" {
                None
            } else {
                options.get("unix")
            }
        })
        .or_else(|| options.get("default"))
        .map(String::as_str)
}

/// Resolve a configured path option into a normalized path string.
pub fn resolve(option: &PathOption, platform: &str) -> Result<String, ConfigError> {
    let raw = match option {
        PathOption::Literal(path) => path.as_str(),
        PathOption::PerPlatform(options) => {
            select(options, platform).ok_or_else(|| ConfigError::NoPlatformMatch {
                platform: platform.to_string(),
                available: options.keys().cloned().collect::<Vec<_>>().join(", "),
            })?
        }
    };
    Ok(paths::normalize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> PathOption {
        PathOption::PerPlatform(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn darwin_is_macos() {
        assert_eq!(normalize("Darwin"), "macos");
        assert_eq!(normalize("Linux"), "linux");
        assert_eq!(normalize("windows"), "windows");
    }

    #[test]
    fn current_is_normalized() {
        let name = current();
        assert_eq!(name, name.to_lowercase());
        assert_ne!(name, "darwin");
    }

    #[test]
    fn exact_platform_wins() {
        let opt = options(&[("macos", "/a"), ("default", "/b")]);
        assert_eq!(resolve(&opt, &normalize("darwin")).unwrap(), "/a");
    }

    #[test]
    fn default_when_no_platform_key() {
        let opt = options(&[("macos", "/a"), ("default", "/b")]);
        assert_eq!(resolve(&opt, "linux").unwrap(), "/b");
    }

    #[test]
    fn unix_before_default_except_windows() {
        let opt = options(&[("unix", "/u"), ("default", "/b")]);
        assert_eq!(resolve(&opt, "linux").unwrap(), "/u");
        assert_eq!(resolve(&opt, "macos").unwrap(), "/u");
        assert_eq!(resolve(&opt, "windows").unwrap(), "/b");
    }

    #[test]
    fn no_match_is_config_error() {
        let opt = options(&[("macos", "/a")]);
        let err = resolve(&opt, "linux").unwrap_err();
        match err {
            ConfigError::NoPlatformMatch {
                platform,
                available,
            } => {
                assert_eq!(platform, "linux");
                assert_eq!(available, "macos");
            }
            other => panic!("expected NoPlatformMatch, got {other:?}"),
        }
    }

    #[test]
    fn literal_is_normalized() {
        let opt = PathOption::Literal("/data//photos/".to_string());
        assert_eq!(resolve(&opt, "linux").unwrap(), "/data/photos");
    }

    #[test]
    fn matches_unix_alias() {
        assert!(matches("macos", "macos"));
        assert!(matches("Darwin", "macos"));
        assert!(matches("unix", "linux"));
        assert!(!matches("unix", "windows"));
        assert!(!matches("windows", "linux"));
    }
}
