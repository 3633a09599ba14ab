// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical plugin directory and command containment.
//!
//! The configured directory is canonicalized once (symlinks resolved) and
//! every external plugin command must canonicalize to a path at or below
//! that root. Nothing here creates files.

use std::path::{Component, Path, PathBuf};

use keyhold_core::KeyholdError;

/// A canonical, symlink-free plugin directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDirectory {
    root: PathBuf,
}

impl PluginDirectory {
    /// Canonicalize `raw` and check that it names an existing directory.
    pub fn resolve(raw: impl AsRef<Path>) -> Result<Self, KeyholdError> {
        let raw = raw.as_ref();
        let root = std::fs::canonicalize(raw).map_err(|source| KeyholdError::PathResolution {
            path: raw.to_path_buf(),
            source,
        })?;
        if !root.is_dir() {
            return Err(KeyholdError::Config(format!(
                "plugin directory {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// The canonical root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `raw` to a canonical path inside the root.
    ///
    /// Relative paths are joined onto the root and the result is
    /// canonicalized; it must equal the root or descend from it. A path that
    /// cannot be canonicalized is reported as an escape when its lexical form
    /// already leaves the root, and as a resolution failure otherwise.
    pub fn contain(&self, raw: impl AsRef<Path>) -> Result<PathBuf, KeyholdError> {
        let raw = raw.as_ref();
        let joined = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.root.join(raw)
        };

        let canonical = match std::fs::canonicalize(&joined) {
            Ok(canonical) => canonical,
            Err(_) if !lexically_normalize(&joined).starts_with(&self.root) => {
                return Err(self.escape(raw));
            }
            Err(source) => {
                return Err(KeyholdError::PathResolution {
                    path: joined,
                    source,
                });
            }
        };

        if !canonical.starts_with(&self.root) {
            return Err(self.escape(&canonical));
        }
        Ok(canonical)
    }

    /// Like [`contain`](Self::contain), but the target must be a regular file.
    pub fn contain_file(&self, raw: impl AsRef<Path>) -> Result<PathBuf, KeyholdError> {
        let resolved = self.contain(raw)?;
        if !resolved.is_file() {
            return Err(KeyholdError::InvalidInput {
                field: "command".to_string(),
                reason: format!("{} is not a regular file", resolved.display()),
            });
        }
        Ok(resolved)
    }

    /// The path of a contained command relative to the root.
    pub fn relative(&self, contained: &Path) -> Result<PathBuf, KeyholdError> {
        contained
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .map_err(|_| self.escape(contained))
    }

    fn escape(&self, path: &Path) -> KeyholdError {
        KeyholdError::PathEscape {
            path: path.to_path_buf(),
            root: self.root.clone(),
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn lexically_normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
