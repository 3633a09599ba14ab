// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyhold secrets host.
//!
//! This crate provides the error taxonomy, shared types, and the trait seams
//! used throughout the Keyhold workspace: the [`PluginBackend`] contract that
//! builtin plugin instances satisfy, and the [`CatalogStorage`] key-value
//! contract the plugin catalog persists through.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::KeyholdError;
pub use traits::{CatalogStorage, PluginBackend};
pub use types::{BackendType, HealthStatus};
