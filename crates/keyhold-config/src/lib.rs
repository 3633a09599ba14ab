// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Keyhold secrets host.
//!
//! Settings come from compiled defaults, the TOML files listed by
//! [`loader::config_file_candidates`], and `KEYHOLD_*` environment
//! variables. Unknown keys are rejected and reported with source spans and
//! "did you mean" suggestions through [`render_errors`].
//!
//! ```no_run
//! let config = keyhold_config::load_and_validate().expect("config errors");
//! println!("plugin directory: {:?}", config.plugin.directory);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::KeyholdConfig;

/// Where a configuration is read from.
#[derive(Debug, Clone, Copy)]
enum ConfigSource<'a> {
    /// Defaults, system/user/local files, then environment.
    Layered,
    /// A single file plus environment.
    File(&'a Path),
    /// A TOML document with no file or environment layers.
    Inline(&'a str),
}

impl ConfigSource<'_> {
    fn extract(self) -> Result<KeyholdConfig, figment::Error> {
        match self {
            ConfigSource::Layered => loader::load_config(),
            ConfigSource::File(path) => loader::load_config_from_path(path),
            ConfigSource::Inline(toml) => loader::load_config_from_str(toml),
        }
    }

    /// `(name, contents)` pairs used to place diagnostics in the source text.
    fn documents(self) -> Vec<(String, String)> {
        match self {
            ConfigSource::Layered => loader::config_file_candidates()
                .iter()
                .filter_map(|path| read_document(path))
                .collect(),
            ConfigSource::File(path) => read_document(path).into_iter().collect(),
            ConfigSource::Inline(toml) => vec![("<inline>".to_string(), toml.to_string())],
        }
    }

    fn load(self) -> Result<KeyholdConfig, Vec<ConfigError>> {
        let config = self
            .extract()
            .map_err(|err| diagnostic::figment_to_config_errors(err, &self.documents()))?;
        validation::validate_config(&config)?;
        Ok(config)
    }
}

fn read_document(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = if path.is_relative() {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    Some((name.display().to_string(), content))
}

/// Load configuration from every layer and validate it.
pub fn load_and_validate() -> Result<KeyholdConfig, Vec<ConfigError>> {
    ConfigSource::Layered.load()
}

/// Load configuration from `path` (plus `KEYHOLD_*` overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<KeyholdConfig, Vec<ConfigError>> {
    ConfigSource::File(path).load()
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<KeyholdConfig, Vec<ConfigError>> {
    ConfigSource::Inline(toml_content).load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_source_reports_unknown_key_with_suggestion() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[plugin]\ndirectroy = \"/opt/plugins\"\n")?;

            let errors = load_and_validate_path(Path::new("custom.toml")).unwrap_err();
            match &errors[0] {
                ConfigError::UnknownKey {
                    key, suggestion, ..
                } => {
                    assert_eq!(key, "directroy");
                    assert_eq!(suggestion.as_deref(), Some("directory"));
                }
                other => panic!("expected UnknownKey, got {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn file_source_applies_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[server]\nlog_level = \"warn\"\n")?;
            jail.set_env("KEYHOLD_SERVER_LOG_LEVEL", "debug");

            let config = load_and_validate_path(Path::new("custom.toml"))
                .map_err(|e| format!("{e:?}"))?;
            assert_eq!(config.server.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn layered_source_validates_after_merge() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("keyhold.toml", "[server]\nlog_level = \"loud\"\n")?;

            let errors = load_and_validate().unwrap_err();
            assert!(matches!(errors[0], ConfigError::Validation { .. }));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_no_documents() {
        let source = ConfigSource::File(Path::new("/nonexistent/keyhold.toml"));
        assert!(source.documents().is_empty());
    }
}
