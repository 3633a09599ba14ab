// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyhold plugin` command implementations.
//!
//! Each invocation opens the configured SQLite catalog, wires in the
//! compiled-in builtin table, and performs a single catalog operation.

use std::path::Path;
use std::sync::Arc;

use keyhold_config::KeyholdConfig;
use keyhold_core::KeyholdError;
use keyhold_plugin::builtin::builtin_description;
use keyhold_plugin::digest::{parse_sha256_hex, sha256_file};
use keyhold_plugin::{default_registry, PluginCatalog, PluginRunner};
use keyhold_storage::SqliteCatalogStorage;
use serde::Serialize;
use tracing::info;

use crate::PluginCommands;

/// Structured view of a resolved plugin for `--json` output.
#[derive(Debug, Serialize)]
pub struct PluginInfo {
    pub name: String,
    pub kind: &'static str,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub sha256: Option<String>,
    pub description: Option<&'static str>,
}

impl PluginInfo {
    fn from_runner(runner: &PluginRunner) -> Self {
        let builtin = runner.is_builtin();
        Self {
            name: runner.name.clone(),
            kind: if builtin { "builtin" } else { "external" },
            command: runner.command().map(|c| c.display().to_string()),
            args: runner.args().to_vec(),
            sha256: (!builtin).then(|| hex::encode(runner.sha256())),
            description: builtin.then(|| builtin_description(&runner.name)).flatten(),
        }
    }
}

/// Open the catalog described by `config`.
pub async fn open_catalog(config: &KeyholdConfig) -> Result<PluginCatalog, KeyholdError> {
    let storage = SqliteCatalogStorage::open(&config.storage).await?;
    PluginCatalog::with_directory_path(
        Arc::new(storage),
        Arc::new(default_registry()),
        config.plugin.directory.as_deref().map(Path::new),
    )
}

/// Run a `keyhold plugin` subcommand.
pub async fn run(config: &KeyholdConfig, action: PluginCommands) -> Result<(), KeyholdError> {
    let catalog = open_catalog(config).await?;
    execute(&catalog, action, &mut std::io::stdout()).await
}

/// Execute `action` against `catalog`, writing human or JSON output to `out`.
pub async fn execute(
    catalog: &PluginCatalog,
    action: PluginCommands,
    out: &mut impl std::io::Write,
) -> Result<(), KeyholdError> {
    match action {
        PluginCommands::List { json } => {
            let names = catalog.list().await?;
            if json {
                write_json(out, &names)?;
            } else {
                for name in &names {
                    write_line(out, name)?;
                }
            }
        }
        PluginCommands::Info { name, json } => {
            let info = PluginInfo::from_runner(&catalog.get(&name).await?);
            if json {
                write_json(out, &info)?;
            } else {
                write_line(out, &format!("name:    {}", info.name))?;
                write_line(out, &format!("kind:    {}", info.kind))?;
                if let Some(description) = info.description {
                    write_line(out, &format!("about:   {description}"))?;
                }
                if let Some(command) = &info.command {
                    write_line(out, &format!("command: {command}"))?;
                }
                if !info.args.is_empty() {
                    write_line(out, &format!("args:    {}", info.args.join(" ")))?;
                }
                if let Some(sha256) = &info.sha256 {
                    write_line(out, &format!("sha256:  {sha256}"))?;
                }
            }
        }
        PluginCommands::Register {
            name,
            command,
            sha256,
            args,
        } => {
            let digest = match sha256 {
                Some(hex) => parse_sha256_hex(&hex)?,
                None => digest_of(catalog, &command).await?,
            };
            catalog.set(&name, &command, args, digest).await?;
            write_line(out, &format!("registered {name}"))?;
        }
        PluginCommands::Deregister { name } => {
            catalog.delete(&name).await?;
            write_line(out, &format!("deregistered {name}"))?;
        }
        PluginCommands::Verify { name } => {
            let runner = catalog.get(&name).await?;
            runner.verify_integrity()?;
            info!(plugin = %name, builtin = runner.is_builtin(), "integrity verified");
            write_line(out, &format!("{name}: ok"))?;
        }
    }
    Ok(())
}

/// Hash the executable named by the first token of `command`.
async fn digest_of(catalog: &PluginCatalog, command: &str) -> Result<Vec<u8>, KeyholdError> {
    let executable = command
        .split_whitespace()
        .next()
        .ok_or_else(|| KeyholdError::InvalidInput {
            field: "command".to_string(),
            reason: "must not be empty".to_string(),
        })?;
    let directory = catalog
        .directory()
        .await
        .ok_or(KeyholdError::DirectoryNotConfigured)?;
    sha256_file(&directory.contain_file(executable)?)
}

fn write_line(out: &mut impl std::io::Write, line: &str) -> Result<(), KeyholdError> {
    writeln!(out, "{line}").map_err(|e| KeyholdError::Internal(format!("failed to write output: {e}")))
}

fn write_json<T: Serialize>(out: &mut impl std::io::Write, value: &T) -> Result<(), KeyholdError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| KeyholdError::Internal(format!("failed to render JSON: {e}")))?;
    write_line(out, &rendered)
}
