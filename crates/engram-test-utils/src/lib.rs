// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Engram integration tests.
//!
//! Provides a deterministic mock embedding adapter and fixture helpers for
//! fast, CI-runnable tests without models or external services.

pub mod harness;
pub mod mock_embedder;

pub use harness::{open_test_database, sample_messages, test_app_state, test_config};
pub use mock_embedder::MockEmbedder;
