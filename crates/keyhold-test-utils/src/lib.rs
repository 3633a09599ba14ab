// SPDX-FileCopyrightText: 2026 Keyhold Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Keyhold integration tests.
//!
//! # Components
//!
//! - [`MemoryStorage`] - in-memory `CatalogStorage` with call counters
//! - [`FailingStorage`] - `CatalogStorage` whose every call fails
//! - [`StaticFactory`] - builtin factory producing a trivial backend
//! - [`TestHarness`] - temp plugin directory plus a ready catalog

pub mod factory;
pub mod harness;
pub mod storage;

pub use factory::StaticFactory;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use storage::{FailingStorage, MemoryStorage};
