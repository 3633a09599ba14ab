// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock `CatalogStorage` implementations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keyhold_core::{CatalogStorage, KeyholdError};
use tokio::sync::RwLock;

/// In-memory key-value store.
///
/// Counts writes so tests can assert that a rejected operation never
/// reached storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    puts: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `put` calls so far.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Write raw bytes, bypassing the counter. Used to plant corrupt records.
    pub async fn insert_raw(&self, key: &str, value: &[u8]) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
    }

    /// Snapshot of every stored key.
    pub async fn keys(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl CatalogStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyholdError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), KeyholdError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KeyholdError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, KeyholdError> {
        Ok(self
            .entries
            .read()
            .await
            .range(prefix.to_string()..)
            .map_while(|(k, _)| k.strip_prefix(prefix).map(str::to_string))
            .collect())
    }
}

/// A store whose every operation fails with `KeyholdError::Storage`.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl FailingStorage {
    fn fail(op: &str, key: &str) -> KeyholdError {
        KeyholdError::storage(
            format!("{op} {key}"),
            std::io::Error::other("backend unavailable"),
        )
    }
}

#[async_trait]
impl CatalogStorage for FailingStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyholdError> {
        Err(Self::fail("get", key))
    }

    async fn put(&self, key: &str, _value: Vec<u8>) -> Result<(), KeyholdError> {
        Err(Self::fail("put", key))
    }

    async fn delete(&self, key: &str) -> Result<(), KeyholdError> {
        Err(Self::fail("delete", key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, KeyholdError> {
        Err(Self::fail("list", prefix))
    }
}
