// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness assembling a catalog over a temporary plugin directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use keyhold_core::{CatalogStorage, KeyholdError};
use keyhold_plugin::digest::sha256_file;
use keyhold_plugin::{BuiltinRegistry, PluginCatalog};
use keyhold_storage::SqliteCatalogStorage;

use crate::factory::StaticFactory;
use crate::storage::MemoryStorage;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    builtins: Vec<String>,
    sqlite: bool,
    with_directory: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            builtins: Vec::new(),
            sqlite: false,
            with_directory: true,
        }
    }

    /// Register a [`StaticFactory`] builtin for each name.
    pub fn with_builtins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtins.extend(names.into_iter().map(Into::into));
        self
    }

    /// Back the catalog with an in-memory SQLite store instead of [`MemoryStorage`].
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Build the catalog without a plugin directory.
    pub fn without_directory(mut self) -> Self {
        self.with_directory = false;
        self
    }

    pub async fn build(self) -> Result<TestHarness, KeyholdError> {
        let plugin_dir = tempfile::TempDir::new().map_err(|source| {
            KeyholdError::PathResolution {
                path: std::env::temp_dir(),
                source,
            }
        })?;

        let builtins = Arc::new(
            self.builtins
                .iter()
                .fold(BuiltinRegistry::builder(), |b, name| {
                    b.register(name.clone(), StaticFactory::new(name.clone()))
                })
                .build(),
        );

        let memory = Arc::new(MemoryStorage::new());
        let storage: Arc<dyn CatalogStorage> = if self.sqlite {
            Arc::new(SqliteCatalogStorage::open_in_memory().await?)
        } else {
            memory.clone()
        };

        let directory = self.with_directory.then(|| plugin_dir.path());
        let catalog = PluginCatalog::with_directory_path(storage, builtins.clone(), directory)?;

        Ok(TestHarness {
            catalog: Arc::new(catalog),
            builtins,
            memory,
            plugin_dir,
        })
    }
}

/// A catalog wired to a fresh temporary plugin directory.
pub struct TestHarness {
    pub catalog: Arc<PluginCatalog>,
    pub builtins: Arc<BuiltinRegistry>,
    /// The in-memory store. Unused by the catalog when built `with_sqlite`.
    pub memory: Arc<MemoryStorage>,
    plugin_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The plugin directory as created (not canonicalized).
    pub fn plugin_dir(&self) -> &Path {
        self.plugin_dir.path()
    }

    /// Canonical path of `file_name` inside the plugin directory.
    pub fn canonical(&self, file_name: &str) -> PathBuf {
        std::fs::canonicalize(self.plugin_dir.path().join(file_name))
            .unwrap_or_else(|_| self.plugin_dir.path().join(file_name))
    }

    /// Write an executable into the plugin directory and return its digest.
    pub fn install(&self, file_name: &str, contents: &[u8]) -> Result<Vec<u8>, KeyholdError> {
        let path = self.plugin_dir.path().join(file_name);
        std::fs::write(&path, contents).map_err(|source| KeyholdError::PathResolution {
            path: path.clone(),
            source,
        })?;
        sha256_file(&path)
    }
}
