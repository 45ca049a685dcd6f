// SPDX-License-Identifier: Apache-2.0

//! Path, upload and redirect checks.

use std::path::Path;

use anyhow::Result;
use reqguard_core::{AllowedHostSet, GuardConfig, TrustedRoot};
use tracing::debug;

use super::types::{PathResult, RedirectResult, UploadResult};

/// Confine `requested` to `--root` or the configured root.
pub fn run_path(
    requested: &str,
    root_override: Option<&Path>,
    resolve: bool,
    config: &GuardConfig,
) -> Result<PathResult> {
    let root = TrustedRoot::open(root_override.unwrap_or(&config.root))?;
    debug!(root = %root, resolve, "Confining requested path");

    let confined = root.confine(requested)?;
    let resolved = if resolve {
        Some(confined.resolve_within(&root)?)
    } else {
        None
    };

    Ok(PathResult {
        root: root.as_path().to_path_buf(),
        confined,
        resolved,
    })
}

/// Confine an upload `filename` to `--dir` or the configured upload directory.
pub fn run_upload(
    filename: &str,
    dir_override: Option<&Path>,
    config: &GuardConfig,
) -> Result<UploadResult> {
    let dir = TrustedRoot::open(dir_override.unwrap_or(&config.upload_dir))?;
    debug!(dir = %dir, "Confining upload file name");

    let confined = dir.confine_upload(filename)?;
    Ok(UploadResult {
        dir: dir.as_path().to_path_buf(),
        confined,
    })
}

/// Validate `next` against `--allow-host` values or the configured hosts.
pub fn run_redirect(
    next: &str,
    allow_hosts: &[String],
    config: &GuardConfig,
) -> Result<RedirectResult> {
    let allowed = if allow_hosts.is_empty() {
        AllowedHostSet::new(&config.allowed_hosts)?
    } else {
        AllowedHostSet::new(allow_hosts)?
    };
    debug!(hosts = allowed.len(), "Validating redirect target");

    let location = allowed.validate_redirect(next)?;
    let host = location.host().to_string();
    Ok(RedirectResult { location, host })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqguard_core::GuardError;

    #[test]
    fn test_run_path_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_path("a/b.txt", Some(dir.path()), false, &GuardConfig::default()).unwrap();
        assert!(result.confined.as_path().starts_with(&result.root));
        assert!(result.resolved.is_none());
    }

    #[test]
    fn test_run_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_path("../x", Some(dir.path()), false, &GuardConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GuardError>(),
            Some(GuardError::PathTraversal)
        ));
    }

    #[test]
    fn test_run_path_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_path("missing.txt", Some(dir.path()), true, &GuardConfig::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GuardError>(),
            Some(GuardError::Io(_))
        ));
    }

    #[test]
    fn test_run_upload_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_upload("avatar.png", Some(dir.path()), &GuardConfig::default()).unwrap();
        assert_eq!(result.confined.as_path(), result.dir.join("avatar.png"));
    }

    #[test]
    fn test_run_upload_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["../avatar.png", "nested/avatar.png", ".."] {
            let err = run_upload(name, Some(dir.path()), &GuardConfig::default()).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<GuardError>(),
                Some(GuardError::PathTraversal)
            ));
        }
    }

    #[test]
    fn test_run_redirect_uses_config_hosts() {
        let result = run_redirect("https://example.com/x", &[], &GuardConfig::default()).unwrap();
        assert_eq!(result.host, "example.com");
    }

    #[test]
    fn test_run_redirect_override_replaces_config() {
        let hosts = vec!["api.example.com".to_string()];
        assert!(run_redirect("https://example.com/", &hosts, &GuardConfig::default()).is_err());
        assert!(run_redirect("https://api.example.com/", &hosts, &GuardConfig::default()).is_ok());
    }
}
