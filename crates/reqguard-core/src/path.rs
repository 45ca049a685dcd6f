// SPDX-License-Identifier: Apache-2.0

//! Path confinement for file-serving requests.
//!
//! [`confine`] maps an untrusted relative path onto a [`TrustedRoot`] purely
//! lexically: `.` and repeated separators collapse, `..` pops a segment, and
//! any `..` that would climb above the root is rejected rather than clamped.
//! No filesystem access happens during confinement.
//!
//! [`confine_upload`] is the stricter variant for upload file names: the
//! name must be one plain segment placed directly in the root.
//!
//! Symlinks are not followed. A caller that serves from a tree where symlinks
//! may point outside the root must call [`ConfinedPath::resolve_within`]
//! before opening the file.
//!
//! # Examples
//!
//! ```
//! use reqguard_core::{TrustedRoot, GuardError};
//!
//! let root = TrustedRoot::lexical("/var/app/data")?;
//!
//! let ok = root.confine("reports/q1.csv").unwrap();
//! assert_eq!(ok.as_path(), std::path::Path::new("/var/app/data/reports/q1.csv"));
//!
//! assert!(matches!(
//!     root.confine("../../etc/passwd"),
//!     Err(GuardError::PathTraversal)
//! ));
//! # Ok::<(), reqguard_core::ConfigError>(())
//! ```

use std::fmt;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{ConfigError, GuardError};

/// Directory that confined paths must stay inside.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedRoot {
    path: PathBuf,
}

impl TrustedRoot {
    /// Opens an existing directory as the trusted root.
    ///
    /// The path is canonicalized, so the stored root contains no symlinks,
    /// `.` or `..` components.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let canonical = std::fs::canonicalize(path).map_err(|e| ConfigError::InvalidRoot {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !canonical.is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: path.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        debug!(root = %canonical.display(), "Trusted root opened");
        Ok(Self { path: canonical })
    }

    /// Accepts an absolute root without touching the filesystem.
    ///
    /// Repeated and trailing separators are dropped. A root containing `..`
    /// is refused since its meaning depends on the filesystem.
    pub fn lexical(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(ConfigError::InvalidRoot {
                path: path.to_path_buf(),
                reason: "must be absolute".to_string(),
            });
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::ParentDir => {
                    return Err(ConfigError::InvalidRoot {
                        path: path.to_path_buf(),
                        reason: "must not contain `..`".to_string(),
                    });
                }
                Component::CurDir => {}
                other => normalized.push(other),
            }
        }

        Ok(Self { path: normalized })
    }

    /// The root directory.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Confines `requested` to this root. See [`confine`].
    pub fn confine(&self, requested: &str) -> Result<ConfinedPath, GuardError> {
        confine(self, requested)
    }

    /// Places an uploaded file directly in this root. See [`confine_upload`].
    pub fn confine_upload(&self, filename: &str) -> Result<ConfinedPath, GuardError> {
        confine_upload(self, filename)
    }
}

impl fmt::Display for TrustedRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Absolute path lexically contained in a [`TrustedRoot`].
///
/// Only [`confine`] creates values of this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConfinedPath {
    path: PathBuf,
    relative: String,
}

impl ConfinedPath {
    /// The confined absolute path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Normalized suffix relative to the root, `/`-separated.
    ///
    /// Empty when the request resolved to the root itself. Feeding this back
    /// into [`confine`] with the same root yields an equal `ConfinedPath`.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Consumes the value, returning the absolute path.
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }

    /// Resolves symlinks on disk and re-checks containment.
    ///
    /// Both the root and this path are canonicalized, so the check also holds
    /// for roots created with [`TrustedRoot::lexical`].
    pub fn resolve_within(&self, root: &TrustedRoot) -> Result<PathBuf, GuardError> {
        let real_root = std::fs::canonicalize(&root.path)?;
        let real = std::fs::canonicalize(&self.path)?;

        if is_contained(&real_root, &real) {
            Ok(real)
        } else {
            debug!(kind = "path_traversal", "Confined path resolves outside root");
            Err(GuardError::PathTraversal)
        }
    }
}

impl AsRef<Path> for ConfinedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ConfinedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Confines an untrusted relative path to `root`.
///
/// `requested` is treated as relative to a synthetic `/` whatever it claims
/// to be, so leading separators are ignored. Both `/` and `\` separate
/// segments.
///
/// # Errors
///
/// [`GuardError::PathTraversal`] when a `..` segment would climb above the
/// root, when `requested` contains a NUL byte, or when the joined result
/// fails the prefix check.
#[instrument(level = "debug", skip(root, requested), fields(len = requested.len()))]
pub fn confine(root: &TrustedRoot, requested: &str) -> Result<ConfinedPath, GuardError> {
    let Some(segments) = normalize(requested) else {
        debug!(
            kind = "path_traversal",
            requested = %requested.escape_debug(),
            "Rejected requested path"
        );
        return Err(GuardError::PathTraversal);
    };

    let mut full = root.path.clone();
    for segment in &segments {
        full.push(segment);
    }

    if !is_contained(&root.path, &full) {
        debug!(
            kind = "path_traversal",
            requested = %requested.escape_debug(),
            "Joined path left the root"
        );
        return Err(GuardError::PathTraversal);
    }

    Ok(ConfinedPath {
        path: full,
        relative: segments.join("/"),
    })
}

/// Confines a client-supplied upload file name to `root`.
///
/// Unlike [`confine`], the name must be a single plain segment: no
/// directories are created or walked, so the file always lands directly in
/// the root.
///
/// # Errors
///
/// [`GuardError::PathTraversal`] when `filename` is empty, is `.` or `..`,
/// contains `/`, `\` or a NUL byte, or fails the prefix check.
#[instrument(level = "debug", skip(root, filename), fields(len = filename.len()))]
pub fn confine_upload(root: &TrustedRoot, filename: &str) -> Result<ConfinedPath, GuardError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0']);

    let full = root.path.join(filename);
    if !plain || !is_contained(&root.path, &full) || full == root.path {
        debug!(
            kind = "path_traversal",
            filename = %filename.escape_debug(),
            "Rejected upload file name"
        );
        return Err(GuardError::PathTraversal);
    }

    Ok(ConfinedPath {
        path: full,
        relative: filename.to_string(),
    })
}

/// Lexically normalizes `requested` into plain segments.
///
/// Returns `None` if a `..` has nothing left to pop or a NUL byte is present.
fn normalize(requested: &str) -> Option<Vec<&str>> {
    if requested.contains('\0') {
        return None;
    }

    let mut stack = Vec::new();
    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            name => stack.push(name),
        }
    }
    Some(stack)
}

/// String-level containment: `candidate` equals `root` or starts with
/// `root` followed by a separator.
fn is_contained(root: &Path, candidate: &Path) -> bool {
    let root = root.as_os_str().as_encoded_bytes();
    let candidate = candidate.as_os_str().as_encoded_bytes();
    let sep = MAIN_SEPARATOR_STR.as_bytes();

    if candidate == root {
        return true;
    }

    match candidate.strip_prefix(root) {
        // A root that already ends in a separator is the filesystem root.
        Some(rest) => root.ends_with(sep) || rest.starts_with(sep),
        None => false,
    }
}
