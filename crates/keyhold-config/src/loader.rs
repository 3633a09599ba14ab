// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./keyhold.toml` > `~/.config/keyhold/keyhold.toml` > `/etc/keyhold/keyhold.toml`
//! with environment variable overrides via `KEYHOLD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::KeyholdConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/keyhold/keyhold.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/keyhold/keyhold.toml`
/// 3. `~/.config/keyhold/keyhold.toml`
/// 4. `./keyhold.toml`
/// 5. `KEYHOLD_*` environment variables
pub fn load_config() -> Result<KeyholdConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<KeyholdConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyholdConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<KeyholdConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(KeyholdConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config files consulted by [`load_config`], lowest precedence first.
///
/// Missing files are skipped by the loader.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("keyhold").join("keyhold.toml"));
    }
    candidates.push(PathBuf::from("keyhold.toml"));
    candidates
}

/// Build the Figment used for XDG config loading, before extraction.
pub fn build_figment() -> Figment {
    config_file_candidates()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(KeyholdConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Environment provider mapping `KEYHOLD_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `KEYHOLD_STORAGE_DATABASE_PATH` must map to
/// `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("KEYHOLD_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("server_", "server.", 1)
            .replacen("plugin_", "plugin.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("KEYHOLD_PLUGIN_DIRECTORY", "/opt/plugins");
            jail.set_env("KEYHOLD_STORAGE_DATABASE_PATH", "/tmp/catalog.db");
            jail.set_env("KEYHOLD_SERVER_LOG_LEVEL", "debug");

            let config = build_figment().extract::<KeyholdConfig>()?;
            assert_eq!(config.plugin.directory.as_deref(), Some("/opt/plugins"));
            assert_eq!(config.storage.database_path, "/tmp/catalog.db");
            assert_eq!(config.server.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn candidates_end_with_local_file() {
        let candidates = config_file_candidates();
        assert_eq!(candidates.first(), Some(&PathBuf::from(SYSTEM_CONFIG_PATH)));
        assert_eq!(candidates.last(), Some(&PathBuf::from("keyhold.toml")));
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "keyhold.toml",
                r#"
[plugin]
directory = "./plugins"
"#,
            )?;
            let config = build_figment().extract::<KeyholdConfig>()?;
            assert_eq!(config.plugin.directory.as_deref(), Some("./plugins"));
            assert!(config.storage.wal_mode);
            Ok(())
        });
    }
}
