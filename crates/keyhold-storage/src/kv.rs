// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the `CatalogStorage` key-value contract.

use async_trait::async_trait;
use keyhold_config::model::StorageConfig;
use keyhold_core::{CatalogStorage, KeyholdError};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::database::{map_tr_err, Database};

/// Key-value store over the `kv_entries` table.
///
/// Every operation is a single statement, so each is atomic on its own.
#[derive(Debug)]
pub struct SqliteCatalogStorage {
    db: Database,
}

impl SqliteCatalogStorage {
    /// Wrap an already-open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, KeyholdError> {
        let db = Database::open_with_mode(&config.database_path, config.wal_mode).await?;
        Ok(Self::new(db))
    }

    /// Open a private in-memory store.
    pub async fn open_in_memory() -> Result<Self, KeyholdError> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    /// Returns the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl CatalogStorage for SqliteCatalogStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyholdError> {
        let owned = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1",
                    params![owned],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(|e| map_tr_err(format!("get {key}"), e))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), KeyholdError> {
        let owned = key.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)",
                    params![owned, value, now],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| map_tr_err(format!("put {key}"), e))?;
        debug!(key, "kv entry written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KeyholdError> {
        let owned = key.to_string();
        let removed = self
            .db
            .connection()
            .call(move |conn| -> Result<usize, rusqlite::Error> {
                conn.execute("DELETE FROM kv_entries WHERE key = ?1", params![owned])
            })
            .await
            .map_err(|e| map_tr_err(format!("delete {key}"), e))?;
        debug!(key, removed, "kv entry deleted");
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, KeyholdError> {
        let owned = prefix.to_string();
        let keys = self
            .db
            .connection()
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut stmt = conn.prepare(
                    "SELECT key FROM kv_entries
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let keys = stmt
                    .query_map(params![owned], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(|e| map_tr_err(format!("list {prefix}"), e))?;

        Ok(keys
            .into_iter()
            .filter_map(|k| k.strip_prefix(prefix).map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_then_get_returns_value() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        store.put("core/plugin-catalog/foo", b"{}".to_vec()).await.unwrap();

        let value = store.get("core/plugin-catalog/foo").await.unwrap();
        assert_eq!(value.as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_previous_value() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        store.put("k", b"one".to_vec()).await.unwrap();
        store.put("k", b"two".to_vec()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"two"[..]));
        assert_eq!(store.list("").await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        store.put("k", b"v".to_vec()).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_sorted_suffixes_under_prefix() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        store.put("core/plugin-catalog/zeta", vec![1]).await.unwrap();
        store.put("core/plugin-catalog/alpha", vec![2]).await.unwrap();
        store.put("core/mounts/alpha", vec![3]).await.unwrap();

        let names = store.list("core/plugin-catalog/").await.unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "zeta".to_string()]);
    }

    #[tokio::test]
    async fn prefix_with_like_wildcards_matches_literally() {
        let store = SqliteCatalogStorage::open_in_memory().await.unwrap();
        store.put("a_b/x", vec![1]).await.unwrap();
        store.put("aXb/y", vec![2]).await.unwrap();

        assert_eq!(store.list("a_b/").await.unwrap(), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("catalog.db").display().to_string(),
            wal_mode: true,
        };

        let store = SqliteCatalogStorage::open(&config).await.unwrap();
        store.put("core/plugin-catalog/foo", vec![7, 8]).await.unwrap();
        store.database().checkpoint().await.unwrap();
        drop(store);

        let reopened = SqliteCatalogStorage::open(&config).await.unwrap();
        assert_eq!(
            reopened.get("core/plugin-catalog/foo").await.unwrap(),
            Some(vec![7, 8])
        );
    }
}
