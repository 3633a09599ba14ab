// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builtin factories for tests.

use async_trait::async_trait;
use keyhold_core::{BackendType, HealthStatus, KeyholdError, PluginBackend};
use keyhold_plugin::BuiltinFactory;

/// Factory whose backends report a fixed name.
#[derive(Debug, Clone)]
pub struct StaticFactory {
    name: String,
    backend_type: BackendType,
}

impl StaticFactory {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, BackendType::Secrets)
    }

    pub fn with_type(name: impl Into<String>, backend_type: BackendType) -> Self {
        Self {
            name: name.into(),
            backend_type,
        }
    }
}

impl BuiltinFactory for StaticFactory {
    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    fn create(&self) -> Result<Box<dyn PluginBackend>, KeyholdError> {
        Ok(Box::new(StaticBackend {
            name: self.name.clone(),
            backend_type: self.backend_type,
        }))
    }
}

#[derive(Debug)]
struct StaticBackend {
    name: String,
    backend_type: BackendType,
}

#[async_trait]
impl PluginBackend for StaticBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 1)
    }

    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    async fn health_check(&self) -> Result<HealthStatus, KeyholdError> {
        Ok(HealthStatus::Healthy)
    }
}
