// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugin catalog: name resolution with builtin override semantics.
//!
//! Lookup order is always persisted storage first, then the builtin table.
//! Registering a name shadows any builtin of that name; deleting the
//! registration makes the builtin resolve again without any restore step.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use keyhold_core::{CatalogStorage, KeyholdError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::directory::PluginDirectory;
use crate::record::{storage_key, CatalogRecord, CATALOG_PREFIX};
use crate::registry::BuiltinProvider;
use crate::runner::PluginRunner;

/// Registry mapping plugin names to runners.
///
/// One read-write lock covers every logical operation and the plugin
/// directory: `set`, `delete` and `set_directory` are exclusive, while
/// `get` and `list` share the lock.
pub struct PluginCatalog {
    storage: Arc<dyn CatalogStorage>,
    builtins: Arc<dyn BuiltinProvider>,
    directory: RwLock<Option<PluginDirectory>>,
}

impl PluginCatalog {
    /// Create a catalog over `storage` and `builtins`.
    ///
    /// Without a directory, external plugins can be neither registered nor
    /// resolved; builtins still resolve.
    pub fn new(
        storage: Arc<dyn CatalogStorage>,
        builtins: Arc<dyn BuiltinProvider>,
        directory: Option<PluginDirectory>,
    ) -> Self {
        Self {
            storage,
            builtins,
            directory: RwLock::new(directory),
        }
    }

    /// Create a catalog, canonicalizing the configured plugin directory.
    pub fn with_directory_path(
        storage: Arc<dyn CatalogStorage>,
        builtins: Arc<dyn BuiltinProvider>,
        directory: Option<&Path>,
    ) -> Result<Self, KeyholdError> {
        let directory = directory.map(PluginDirectory::resolve).transpose()?;
        Ok(Self::new(storage, builtins, directory))
    }

    /// Point the catalog at a new plugin directory, or none.
    ///
    /// Stored commands are relative, so existing registrations resolve
    /// against the new root on their next lookup.
    pub async fn set_directory(&self, directory: Option<&Path>) -> Result<(), KeyholdError> {
        let resolved = directory.map(PluginDirectory::resolve).transpose()?;
        let mut guard = self.directory.write().await;
        info!(
            directory = ?resolved.as_ref().map(PluginDirectory::root),
            "plugin directory reconfigured"
        );
        *guard = resolved;
        Ok(())
    }

    /// The canonical plugin directory, if configured.
    pub async fn directory(&self) -> Option<PluginDirectory> {
        self.directory.read().await.clone()
    }

    /// Resolve `name` to a runner.
    ///
    /// A persisted record wins over a builtin. A malformed record is an
    /// error, never a silent fallback to the builtin it shadows. The stored
    /// command is re-contained against the current root on every read.
    pub async fn get(&self, name: &str) -> Result<PluginRunner, KeyholdError> {
        validate_name(name)?;
        let guard = self.directory.read().await;

        if let Some(bytes) = self.storage.get(&storage_key(name)).await? {
            let record = CatalogRecord::decode(name, &bytes)?;
            let directory = guard.as_ref().ok_or(KeyholdError::DirectoryNotConfigured)?;
            let command = directory.contain_file(&record.command)?;
            debug!(plugin = %name, command = %command.display(), "resolved external plugin");
            return Ok(PluginRunner::external(
                name,
                command,
                record.args,
                record.sha256,
            ));
        }

        match self.builtins.lookup(name) {
            Some(factory) => {
                debug!(plugin = %name, "resolved builtin plugin");
                Ok(PluginRunner::builtin(name, factory))
            }
            None => Err(KeyholdError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Register an external plugin, replacing any previous registration.
    ///
    /// The first whitespace-separated token of `command` is the executable;
    /// remaining tokens are prepended to `args`. The executable must resolve
    /// to a regular file inside the plugin directory, otherwise nothing is
    /// written.
    pub async fn set(
        &self,
        name: &str,
        command: &str,
        args: Vec<String>,
        sha256: Vec<u8>,
    ) -> Result<(), KeyholdError> {
        validate_name(name)?;
        let mut tokens = command.split_whitespace();
        let executable = tokens.next().ok_or_else(|| KeyholdError::InvalidInput {
            field: "command".to_string(),
            reason: "must not be empty".to_string(),
        })?;
        let args: Vec<String> = tokens.map(str::to_string).chain(args).collect();

        let guard = self.directory.write().await;
        let directory = guard.as_ref().ok_or(KeyholdError::DirectoryNotConfigured)?;

        let resolved = directory.contain_file(executable).inspect_err(|e| {
            warn!(plugin = %name, command = executable, error = %e, "rejected plugin command");
        })?;
        let relative = directory.relative(&resolved)?;
        let relative = relative
            .to_str()
            .ok_or_else(|| KeyholdError::InvalidInput {
                field: "command".to_string(),
                reason: format!("{} is not valid UTF-8", relative.display()),
            })?
            .to_string();

        let record = CatalogRecord::new(name, relative, args, sha256);
        self.storage
            .put(&storage_key(name), record.encode()?)
            .await?;

        let shadows_builtin = self.builtins.lookup(name).is_some();
        info!(
            plugin = %name,
            command = %resolved.display(),
            shadows_builtin,
            "plugin registered"
        );
        Ok(())
    }

    /// Remove the registration for `name`. Removing an absent name succeeds.
    pub async fn delete(&self, name: &str) -> Result<(), KeyholdError> {
        validate_name(name)?;
        let _guard = self.directory.write().await;
        self.storage.delete(&storage_key(name)).await?;
        info!(plugin = %name, "plugin deregistered");
        Ok(())
    }

    /// All resolvable names, persisted and builtin, sorted and de-duplicated.
    pub async fn list(&self) -> Result<Vec<String>, KeyholdError> {
        let _guard = self.directory.read().await;
        let persisted = self.storage.list(CATALOG_PREFIX).await?;

        let names: BTreeSet<String> = persisted.into_iter().chain(self.builtins.keys()).collect();
        Ok(names.into_iter().collect())
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("builtins", &self.builtins.keys().len())
            .finish_non_exhaustive()
    }
}

/// Reject names that cannot serve as a single storage key segment.
fn validate_name(name: &str) -> Result<(), KeyholdError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains("..") {
        "must not contain '..'"
    } else if name.contains(['/', '\\']) {
        "must not contain path separators"
    } else {
        return Ok(());
    };

    Err(KeyholdError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
