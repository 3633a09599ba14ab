// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait for in-process plugin backends.

use async_trait::async_trait;

use crate::error::KeyholdError;
use crate::types::{BackendType, HealthStatus};

/// A running, in-process plugin backend.
///
/// Builtin factories produce instances of this trait. External plugins run
/// as separate executables and never surface through it.
#[async_trait]
pub trait PluginBackend: Send + Sync + 'static {
    /// Returns the catalog name of this backend.
    fn name(&self) -> &str;

    /// Returns the semantic version of this backend.
    fn version(&self) -> semver::Version;

    /// Returns the kind of backend (database, secrets, auth).
    fn backend_type(&self) -> BackendType;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, KeyholdError>;
}
