// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted form of an externally registered plugin.
//!
//! Records are JSON documents stored under `core/plugin-catalog/<name>`.
//! `command` holds the path relative to the plugin directory; the catalog
//! joins it onto the current canonical root at read time.

use keyhold_core::KeyholdError;
use serde::{Deserialize, Serialize};

/// Storage key prefix reserved for the plugin catalog.
pub const CATALOG_PREFIX: &str = "core/plugin-catalog/";

/// Storage key for the plugin `name`.
pub fn storage_key(name: &str) -> String {
    format!("{CATALOG_PREFIX}{name}")
}

/// A catalog entry as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    /// Executable path relative to the plugin directory.
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(with = "hex::serde")]
    pub sha256: Vec<u8>,
    /// Always false; builtin entries are never persisted.
    #[serde(default)]
    pub builtin: bool,
}

impl CatalogRecord {
    pub fn new(name: &str, command: String, args: Vec<String>, sha256: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            command,
            args,
            sha256,
            builtin: false,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, KeyholdError> {
        serde_json::to_vec(self).map_err(|e| KeyholdError::Serialization {
            name: self.name.clone(),
            source: Box::new(e),
        })
    }

    /// Decode the record stored under the key for `name`.
    ///
    /// A record claiming to be builtin, naming a different plugin than its
    /// key, or carrying an empty command is malformed.
    pub fn decode(name: &str, bytes: &[u8]) -> Result<Self, KeyholdError> {
        let malformed = |source: Box<dyn std::error::Error + Send + Sync>| {
            KeyholdError::Serialization {
                name: name.to_string(),
                source,
            }
        };

        let record: Self = serde_json::from_slice(bytes).map_err(|e| malformed(Box::new(e)))?;
        if record.builtin {
            return Err(malformed("persisted record is marked builtin".into()));
        }
        if record.name != name {
            return Err(malformed(
                format!("record names plugin '{}'", record.name).into(),
            ));
        }
        if record.command.trim().is_empty() {
            return Err(malformed("persisted record has an empty command".into()));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_uses_catalog_prefix() {
        assert_eq!(
            storage_key("mysql-database-plugin"),
            "core/plugin-catalog/mysql-database-plugin"
        );
    }

    #[test]
    fn encoded_record_has_expected_fields() {
        let record = CatalogRecord::new(
            "custom",
            "bin/custom".into(),
            vec!["--tls".into()],
            vec![0xde, 0xad],
        );
        let json: serde_json::Value = serde_json::from_slice(&record.encode().unwrap()).unwrap();

        assert_eq!(json["name"], "custom");
        assert_eq!(json["command"], "bin/custom");
        assert_eq!(json["args"], serde_json::json!(["--tls"]));
        assert_eq!(json["sha256"], "dead");
        assert_eq!(json["builtin"], false);
    }

    #[test]
    fn decode_accepts_record_without_args() {
        let bytes = br#"{"name":"p","command":"p","sha256":"00ff"}"#;
        let record = CatalogRecord::decode("p", bytes).unwrap();
        assert!(record.args.is_empty());
        assert_eq!(record.sha256, vec![0x00, 0xff]);
        assert!(!record.builtin);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = CatalogRecord::decode("p", b"not json").unwrap_err();
        assert!(matches!(err, KeyholdError::Serialization { ref name, .. } if name == "p"));
    }

    #[test]
    fn decode_rejects_builtin_flag() {
        let bytes = br#"{"name":"p","command":"p","sha256":"","builtin":true}"#;
        let err = CatalogRecord::decode("p", bytes).unwrap_err();
        assert!(err.to_string().contains("marked builtin"));
    }

    #[test]
    fn decode_rejects_name_mismatch() {
        let record = CatalogRecord::new("other", "x".into(), vec![], vec![]);
        let err = CatalogRecord::decode("p", &record.encode().unwrap()).unwrap_err();
        assert!(matches!(err, KeyholdError::Serialization { .. }));
    }

    #[test]
    fn decode_rejects_non_hex_digest() {
        let bytes = br#"{"name":"p","command":"p","sha256":"zz"}"#;
        assert!(CatalogRecord::decode("p", bytes).is_err());
    }

    #[test]
    fn decode_rejects_empty_command() {
        let bytes = br#"{"name":"p","command":"","sha256":"00"}"#;
        let err = CatalogRecord::decode("p", bytes).unwrap_err();
        assert!(matches!(err, KeyholdError::Serialization { ref name, .. } if name == "p"));
        assert!(err.to_string().contains("empty command"));
    }
}
