// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `engram-core::types` for use across
//! the store boundaries. This module re-exports them for convenience within
//! the storage crate.

pub use engram_core::types::{Document, DocumentCollection, Message, Session};
