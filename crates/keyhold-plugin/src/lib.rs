// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin catalog for the Keyhold secrets host.
//!
//! The catalog resolves a plugin name to a [`PluginRunner`]. Externally
//! registered plugins are persisted through a
//! [`CatalogStorage`](keyhold_core::CatalogStorage) and always take
//! precedence; compiled-in plugins come from an immutable
//! [`BuiltinProvider`] and reappear whenever no persisted override exists.
//! Every external command is contained in a canonical [`PluginDirectory`].

pub mod builtin;
pub mod catalog;
pub mod digest;
pub mod directory;
pub mod record;
pub mod registry;
pub mod runner;

pub use builtin::default_registry;
pub use catalog::PluginCatalog;
pub use directory::PluginDirectory;
pub use registry::{BuiltinFactory, BuiltinProvider, BuiltinRegistry, BuiltinRegistryBuilder};
pub use runner::{PluginRunner, PluginSource};
