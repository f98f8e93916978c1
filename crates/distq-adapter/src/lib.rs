// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! The framework adapter boundary: everything distq-core's scheduler needs
//! to know about a test framework, and nothing more (spec.md §9's
//! "capability set").

pub mod subprocess;

mod shell;

pub use shell::{AdapterError, FrameworkAdapter, ShellSuiteAdapter, SuiteHandle};

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSuiteAdapter, SuiteCall};
