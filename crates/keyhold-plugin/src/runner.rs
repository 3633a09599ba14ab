// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner descriptors returned by the plugin catalog.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use keyhold_core::KeyholdError;

use crate::digest;
use crate::registry::BuiltinFactory;

/// Where a plugin's implementation comes from.
///
/// A runner is either backed by an in-process factory or by an external
/// executable, never both.
#[derive(Clone)]
pub enum PluginSource {
    /// Compiled into the host. The factory is never persisted.
    Builtin(Arc<dyn BuiltinFactory>),
    /// A contained executable registered in the catalog.
    External {
        /// Canonical absolute path inside the plugin directory.
        command: PathBuf,
        /// Arguments passed to the executable at launch.
        args: Vec<String>,
        /// SHA-256 digest of the executable recorded at registration.
        sha256: Vec<u8>,
    },
}

impl std::fmt::Debug for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginSource::Builtin(factory) => f
                .debug_tuple("Builtin")
                .field(&factory.backend_type())
                .finish(),
            PluginSource::External {
                command,
                args,
                sha256,
            } => f
                .debug_struct("External")
                .field("command", command)
                .field("args", args)
                .field("sha256", &hex::encode(sha256))
                .finish(),
        }
    }
}

impl PartialEq for PluginSource {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PluginSource::Builtin(a), PluginSource::Builtin(b)) => Arc::ptr_eq(a, b),
            (
                PluginSource::External {
                    command: c1,
                    args: a1,
                    sha256: s1,
                },
                PluginSource::External {
                    command: c2,
                    args: a2,
                    sha256: s2,
                },
            ) => c1 == c2 && a1 == a2 && s1 == s2,
            _ => false,
        }
    }
}

/// A plugin resolved by name, ready to be launched or instantiated.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginRunner {
    /// Catalog name (case-sensitive).
    pub name: String,
    /// Implementation source.
    pub source: PluginSource,
}

impl PluginRunner {
    pub(crate) fn builtin(name: impl Into<String>, factory: Arc<dyn BuiltinFactory>) -> Self {
        Self {
            name: name.into(),
            source: PluginSource::Builtin(factory),
        }
    }

    // Only the catalog constructs external runners, after containment.
    pub(crate) fn external(
        name: impl Into<String>,
        command: PathBuf,
        args: Vec<String>,
        sha256: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            source: PluginSource::External {
                command,
                args,
                sha256,
            },
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.source, PluginSource::Builtin(_))
    }

    /// The contained executable path; `None` for builtins.
    pub fn command(&self) -> Option<&Path> {
        match &self.source {
            PluginSource::External { command, .. } => Some(command),
            PluginSource::Builtin(_) => None,
        }
    }

    /// Launch arguments; empty for builtins.
    pub fn args(&self) -> &[String] {
        match &self.source {
            PluginSource::External { args, .. } => args,
            PluginSource::Builtin(_) => &[],
        }
    }

    /// Recorded content hash; empty for builtins.
    pub fn sha256(&self) -> &[u8] {
        match &self.source {
            PluginSource::External { sha256, .. } => sha256,
            PluginSource::Builtin(_) => &[],
        }
    }

    /// The in-process factory; `None` for external plugins.
    pub fn factory(&self) -> Option<&Arc<dyn BuiltinFactory>> {
        match &self.source {
            PluginSource::Builtin(factory) => Some(factory),
            PluginSource::External { .. } => None,
        }
    }

    /// Re-hash the external executable and compare with the recorded digest.
    ///
    /// Builtins always pass. Call this immediately before launching.
    pub fn verify_integrity(&self) -> Result<(), KeyholdError> {
        let PluginSource::External {
            command, sha256, ..
        } = &self.source
        else {
            return Ok(());
        };

        let actual = digest::sha256_file(command)?;
        if actual != *sha256 {
            return Err(KeyholdError::IntegrityMismatch {
                name: self.name.clone(),
                expected: hex::encode(sha256),
                actual: hex::encode(actual),
            });
        }
        Ok(())
    }
}
