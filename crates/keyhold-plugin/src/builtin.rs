// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builtin plugin table compiled into the Keyhold binary.
//!
//! Only the database credential plugins ship in-process. Each entry is backed
//! by a [`DatabasePluginFactory`] producing a lightweight backend handle.

use async_trait::async_trait;
use keyhold_core::{BackendType, HealthStatus, KeyholdError, PluginBackend};

use crate::registry::{BuiltinFactory, BuiltinRegistry};

/// Name and description of each compiled-in database plugin.
pub const BUILTIN_DATABASE_PLUGINS: &[(&str, &str)] = &[
    ("cassandra-database-plugin", "Apache Cassandra dynamic credentials"),
    ("hana-database-plugin", "SAP HANA dynamic credentials"),
    ("mongodb-database-plugin", "MongoDB dynamic credentials"),
    ("mssql-database-plugin", "Microsoft SQL Server dynamic credentials"),
    ("mysql-aurora-database-plugin", "Amazon Aurora MySQL dynamic credentials"),
    ("mysql-database-plugin", "MySQL dynamic credentials"),
    ("mysql-legacy-database-plugin", "MySQL (pre-5.7 username limits) dynamic credentials"),
    ("mysql-rds-database-plugin", "Amazon RDS MySQL dynamic credentials"),
    ("postgresql-database-plugin", "PostgreSQL dynamic credentials"),
];

/// Description of a compiled-in plugin, if `name` is one.
pub fn builtin_description(name: &str) -> Option<&'static str> {
    BUILTIN_DATABASE_PLUGINS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, description)| description)
}

/// Returns the registry of all compiled-in plugins.
pub fn default_registry() -> BuiltinRegistry {
    BUILTIN_DATABASE_PLUGINS
        .iter()
        .fold(BuiltinRegistry::builder(), |builder, &(name, _)| {
            builder.register(name, DatabasePluginFactory { name })
        })
        .build()
}

/// Factory for a compiled-in database plugin.
#[derive(Debug, Clone, Copy)]
pub struct DatabasePluginFactory {
    name: &'static str,
}

impl BuiltinFactory for DatabasePluginFactory {
    fn backend_type(&self) -> BackendType {
        BackendType::Database
    }

    fn create(&self) -> Result<Box<dyn PluginBackend>, KeyholdError> {
        Ok(Box::new(DatabasePlugin { name: self.name }))
    }
}

/// In-process handle for a builtin database plugin.
#[derive(Debug)]
struct DatabasePlugin {
    name: &'static str,
}

#[async_trait]
impl PluginBackend for DatabasePlugin {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Database
    }

    async fn health_check(&self) -> Result<HealthStatus, KeyholdError> {
        Ok(HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BuiltinProvider;

    #[test]
    fn default_registry_contains_every_database_plugin() {
        let registry = default_registry();
        assert_eq!(registry.len(), BUILTIN_DATABASE_PLUGINS.len());
        assert!(registry.contains("mysql-database-plugin"));
        assert!(registry.contains("postgresql-database-plugin"));
    }

    #[test]
    fn builtin_description_lookup() {
        assert_eq!(
            builtin_description("postgresql-database-plugin"),
            Some("PostgreSQL dynamic credentials")
        );
        assert_eq!(builtin_description("vault-plugin-secrets-kv"), None);
    }

    #[test]
    fn default_registry_keys_are_sorted() {
        let keys = default_registry().keys();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn factories_create_matching_backends() {
        let registry = default_registry();
        for name in registry.keys() {
            let factory = registry.lookup(&name).unwrap();
            assert_eq!(factory.backend_type(), BackendType::Database);

            let backend = factory.create().unwrap();
            assert_eq!(backend.name(), name);
            assert_eq!(backend.backend_type(), BackendType::Database);
            assert_eq!(backend.health_check().await.unwrap(), HealthStatus::Healthy);
        }
    }
}
