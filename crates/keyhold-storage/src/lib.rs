// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the Keyhold plugin catalog.
//!
//! Provides a WAL-mode SQLite database with embedded migrations and a
//! single-writer concurrency model via `tokio-rusqlite`, exposed to the
//! catalog as a flat key-value [`CatalogStorage`](keyhold_core::CatalogStorage).

pub mod database;
pub mod kv;
pub mod migrations;

pub use database::Database;
pub use kv::SqliteCatalogStorage;
