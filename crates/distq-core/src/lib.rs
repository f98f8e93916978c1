// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! distq-core: shared data model for the distributed test executor.
//!
//! Suite identity, the dispatch queue, the whitelist, worker/result records,
//! the run token, and the immutable per-run context are defined here so that
//! `distq-master`, `distq-worker`, `distq-discover`, and `distq-protocol` all
//! agree on a single vocabulary.

pub mod context;
pub mod id;
pub mod queue;
pub mod suite;
pub mod time_fmt;
pub mod worker;

pub use context::{worker_output_path, worker_suites_path, Endpoint, RelayConfig, RunContext};
pub use id::RunToken;
pub use queue::{Queue, Whitelist};
pub use suite::{SuiteId, SuiteOutcome, SuiteRecord, SuiteResult};
pub use time_fmt::format_elapsed_secs_f64;
pub use worker::WorkerRecord;
