//! Applying planned changes.

use anyhow::{Context, Result};

use crate::manifest::{Direction, Manifest};
use crate::progress;
use crate::signals;
use crate::ui;

/// Copy every manifest in `direction`, one at a time.
///
/// Stops at the first failure; manifests copied before it stay copied.
/// Returns the number of manifests applied.
pub fn apply_changes(
    client: &rclone::Client,
    manifests: &[&Manifest],
    direction: Direction,
) -> Result<usize> {
    for (index, manifest) in manifests.iter().enumerate() {
        signals::check()?;

        let (from, to) = manifest.endpoints(direction);
        let spinner = progress::spinner(&format!(
            "[{}/{}] Copying {} -> {}",
            index + 1,
            manifests.len(),
            ui::truncate_path(from, 40),
            ui::truncate_path(to, 40)
        ));
        let result = client.copy(manifest.args(direction));
        progress::finish_clear(&spinner);

        result.with_context(|| format!("Failed to {direction} {from} -> {to}"))?;
        ui::success(&format!("{from} -> {to}"));
    }

    Ok(manifests.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rclone::backend::scripted::ScriptedBackend;
    use rclone::{Client, Mode};

    #[test]
    fn applies_each_manifest_in_order() {
        let backend = ScriptedBackend::new();
        let client = Client::with_backend(Box::new(backend.clone()));
        let a = Manifest::new("/a", "r:a", vec!["- *.tmp".to_string()], vec![]);
        let b = Manifest::new("/b", "r:b", vec![], vec![]);

        let applied = apply_changes(&client, &[&a, &b], Direction::Upload).unwrap();
        assert_eq!(applied, 2);

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.mode == Mode::Apply));
        assert_eq!(calls[0].args, ["--filter", "- *.tmp", "/a", "r:a"]);
        assert_eq!(calls[1].args, ["/b", "r:b"]);
    }

    #[test]
    fn stops_at_first_failure() {
        let backend = ScriptedBackend::new();
        backend.push_failure(5, "permission denied");
        let client = Client::with_backend(Box::new(backend.clone()));
        let a = Manifest::new("/a", "r:a", vec![], vec![]);
        let b = Manifest::new("/b", "r:b", vec![], vec![]);

        let err = apply_changes(&client, &[&a, &b], Direction::Download).unwrap_err();
        assert_eq!(
            err.downcast_ref::<rclone::Error>().and_then(rclone::Error::exit_code),
            Some(5)
        );
        assert!(err.to_string().contains("Failed to download r:a -> /a"));
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn nothing_to_apply() {
        let backend = ScriptedBackend::new();
        let client = Client::with_backend(Box::new(backend.clone()));
        assert_eq!(apply_changes(&client, &[], Direction::Upload).unwrap(), 0);
        assert!(backend.calls().is_empty());
    }
}
