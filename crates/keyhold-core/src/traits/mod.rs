// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the plugin catalog and the rest of the host.
//!
//! Async traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod backend;
pub mod storage;

pub use backend::PluginBackend;
pub use storage::CatalogStorage;
