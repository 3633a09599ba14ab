// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyhold secrets host.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type used across the catalog, storage, and binary crates.
///
/// Variants carry the operation and plugin name they failed on; callers are
/// expected to match on the variant rather than parse the message.
#[derive(Debug, Error)]
pub enum KeyholdError {
    /// Configuration errors discovered after the config layer has loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// The name is absent from both persisted storage and the builtin registry.
    #[error("plugin not found in catalog: {name}")]
    NotFound { name: String },

    /// A command path canonicalizes outside the plugin directory.
    #[error("path {path} escapes the plugin directory {root}")]
    PathEscape { path: PathBuf, root: PathBuf },

    /// A filesystem path could not be canonicalized or read.
    #[error("failed to resolve path {path}: {source}")]
    PathResolution {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No plugin directory is configured, so external plugins cannot be registered.
    #[error("no plugin directory is configured")]
    DirectoryNotConfigured,

    /// The plugin name cannot be used as a catalog key.
    #[error("invalid plugin name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// A registration argument (command, digest) is malformed.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Backing store I/O failure, passed through without retry.
    #[error("storage error during {context}: {source}")]
    Storage {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A persisted catalog record could not be encoded or decoded.
    #[error("malformed catalog record for plugin '{name}': {source}")]
    Serialization {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The executable on disk no longer matches the digest recorded at registration.
    #[error("integrity check failed for plugin '{name}': expected sha256 {expected}, found {actual}")]
    IntegrityMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeyholdError {
    /// Wrap a backing-store failure with the operation it interrupted.
    pub fn storage(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Returns true if this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
