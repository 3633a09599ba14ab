// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyhold - plugin catalog administration for the secrets host.
//!
//! This is the binary entry point for the `keyhold` command.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod plugin;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keyhold_config::KeyholdConfig;
use tracing::error;

/// Keyhold - plugin catalog administration for the secrets host.
#[derive(Parser, Debug)]
#[command(name = "keyhold", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the plugin catalog.
    Plugin {
        #[command(subcommand)]
        action: PluginCommands,
    },
}

/// Plugin catalog subcommands.
#[derive(Subcommand, Debug)]
pub enum PluginCommands {
    /// List every resolvable plugin name.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show how a plugin name resolves.
    Info {
        /// Plugin name.
        name: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Register an external plugin, shadowing any builtin of the same name.
    Register {
        /// Plugin name.
        name: String,
        /// Executable inside the plugin directory, optionally followed by arguments.
        #[arg(long)]
        command: String,
        /// Hex SHA-256 of the executable. Computed from the file when omitted.
        #[arg(long)]
        sha256: Option<String>,
        /// Launch argument (repeatable).
        #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove a registration. A shadowed builtin resolves again.
    Deregister {
        /// Plugin name.
        name: String,
    },
    /// Re-hash an external plugin and compare with its recorded digest.
    Verify {
        /// Plugin name.
        name: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            keyhold_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.server.log_level);

    let result = match cli.command {
        Commands::Plugin { action } => plugin::run(&config, action).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<KeyholdConfig, Vec<keyhold_config::ConfigError>> {
    match path {
        Some(path) => keyhold_config::load_and_validate_path(path),
        None => keyhold_config::load_and_validate(),
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyhold={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
