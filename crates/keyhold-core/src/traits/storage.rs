// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value storage contract the plugin catalog persists through.

use async_trait::async_trait;

use crate::error::KeyholdError;

/// Durable key-value storage supplied by the host.
///
/// Each call is individually atomic. No cross-key transactions are assumed.
/// Failures are reported as [`KeyholdError::Storage`]; retry policy, if any,
/// belongs to the implementation.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KeyholdError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), KeyholdError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), KeyholdError>;

    /// Lists the suffixes of all keys starting with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, KeyholdError>;
}
