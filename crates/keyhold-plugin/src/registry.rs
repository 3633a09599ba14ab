// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of compiled-in (builtin) plugin factories.
//!
//! The registry is assembled once at process start through
//! [`BuiltinRegistryBuilder`] and is read-only afterwards. The catalog only
//! sees it through the [`BuiltinProvider`] trait.

use std::collections::HashMap;
use std::sync::Arc;

use keyhold_core::{BackendType, KeyholdError, PluginBackend};

/// Factory for creating in-process plugin backend instances.
pub trait BuiltinFactory: Send + Sync {
    /// The backend type this factory produces.
    fn backend_type(&self) -> BackendType;

    /// Create a new backend instance.
    fn create(&self) -> Result<Box<dyn PluginBackend>, KeyholdError>;
}

/// Read-only view of the builtin plugin table.
pub trait BuiltinProvider: Send + Sync {
    /// Look up the factory registered under `name`.
    fn lookup(&self, name: &str) -> Option<Arc<dyn BuiltinFactory>>;

    /// All registered names, in ascending order.
    fn keys(&self) -> Vec<String>;
}

/// Immutable table of builtin factories keyed by plugin name.
pub struct BuiltinRegistry {
    factories: HashMap<String, Arc<dyn BuiltinFactory>>,
}

impl BuiltinRegistry {
    /// Start assembling a registry.
    pub fn builder() -> BuiltinRegistryBuilder {
        BuiltinRegistryBuilder::default()
    }

    /// A registry with no builtins.
    pub fn empty() -> Self {
        Self::builder().build()
    }

    /// Returns true if a builtin named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the number of registered builtins.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if no builtins are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl BuiltinProvider for BuiltinRegistry {
    fn lookup(&self, name: &str) -> Option<Arc<dyn BuiltinFactory>> {
        self.factories.get(name).cloned()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.factories.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinRegistry")
            .field("names", &self.keys())
            .finish()
    }
}

/// Builder for [`BuiltinRegistry`]. Registering a name twice keeps the last factory.
#[derive(Default)]
pub struct BuiltinRegistryBuilder {
    factories: HashMap<String, Arc<dyn BuiltinFactory>>,
}

impl BuiltinRegistryBuilder {
    /// Register `factory` under `name`.
    pub fn register(self, name: impl Into<String>, factory: impl BuiltinFactory + 'static) -> Self {
        self.register_shared(name, Arc::new(factory))
    }

    /// Register an already-shared factory under `name`.
    pub fn register_shared(
        mut self,
        name: impl Into<String>,
        factory: Arc<dyn BuiltinFactory>,
    ) -> Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Freeze the table.
    pub fn build(self) -> BuiltinRegistry {
        BuiltinRegistry {
            factories: self.factories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keyhold_core::HealthStatus;

    struct Echo(&'static str);

    #[async_trait]
    impl PluginBackend for Echo {
        fn name(&self) -> &str {
            self.0
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(1, 0, 0)
        }

        fn backend_type(&self) -> BackendType {
            BackendType::Secrets
        }

        async fn health_check(&self) -> Result<HealthStatus, KeyholdError> {
            Ok(HealthStatus::Healthy)
        }
    }

    struct EchoFactory(&'static str);

    impl BuiltinFactory for EchoFactory {
        fn backend_type(&self) -> BackendType {
            BackendType::Secrets
        }

        fn create(&self) -> Result<Box<dyn PluginBackend>, KeyholdError> {
            Ok(Box::new(Echo(self.0)))
        }
    }

    #[test]
    fn lookup_returns_registered_factory() {
        let registry = BuiltinRegistry::builder()
            .register("kv", EchoFactory("kv"))
            .build();

        let factory = registry.lookup("kv").unwrap();
        assert_eq!(factory.create().unwrap().name(), "kv");
        assert!(registry.lookup("KV").is_none(), "names are case-sensitive");
    }

    #[test]
    fn lookup_hands_out_the_same_factory() {
        let registry = BuiltinRegistry::builder()
            .register("kv", EchoFactory("kv"))
            .build();

        let a = registry.lookup("kv").unwrap();
        let b = registry.lookup("kv").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn keys_are_sorted() {
        let registry = BuiltinRegistry::builder()
            .register("zebra", EchoFactory("zebra"))
            .register("alpha", EchoFactory("alpha"))
            .register("middle", EchoFactory("middle"))
            .build();

        assert_eq!(registry.keys(), vec!["alpha", "middle", "zebra"]);
    }

    #[test]
    fn duplicate_registration_keeps_last() {
        let registry = BuiltinRegistry::builder()
            .register("kv", EchoFactory("first"))
            .register("kv", EchoFactory("second"))
            .build();

        assert_eq!(registry.len(), 1);
        let backend = registry.lookup("kv").unwrap().create().unwrap();
        assert_eq!(backend.name(), "second");
    }

    #[test]
    fn empty_registry() {
        let registry = BuiltinRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.keys().is_empty());
        assert!(!registry.contains("anything"));
    }
}
