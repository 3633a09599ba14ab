// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by plugin backends and the catalog.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by plugin backend health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// The kind of backend a plugin implements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Dynamic database credential backends.
    Database,
    /// Secret engines mounted under a path.
    Secrets,
    /// Authentication methods.
    Auth,
}
