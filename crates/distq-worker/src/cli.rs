// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments the run driver forks a worker with (spec.md §4.2,
//! §6.3). Every field is an explicit argument rather than an inherited
//! environment — the worker is a plain child process, not a fork of the
//! driver's address space.

use clap::Parser;
use distq_core::Endpoint;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distq-worker", about = "Distributed test executor worker")]
pub struct Args {
    /// This run's token, to reject replies from a stale run.
    #[arg(long)]
    pub token: String,

    /// This worker's index within its host's concurrency (0-based).
    #[arg(long)]
    pub num: u32,

    /// Hostname reported in the worker record (own host for local workers,
    /// the relay's announced hostname for remote ones).
    #[arg(long)]
    pub host: String,

    /// Where the master (primary, for both local and relayed workers)
    /// listens, in `unix:<path>` or `tcp:<host>:<port>` form.
    #[arg(long)]
    pub endpoint: String,

    /// Scratch directory the master expects `worker_<pid>_output` and
    /// `worker_<pid>_suites` handoff files to appear in at exit; this
    /// worker's own pid picks the exact filenames, so the master does not
    /// need to know the pid before forking (spec.md §5 "Shared resources").
    #[arg(long)]
    pub scratch_dir: PathBuf,

    /// Path to the framework-specific runner binary.
    #[arg(long)]
    pub runner: PathBuf,

    /// Glob pattern the runner's suites are drawn from. Only used to
    /// reconstruct a `SuiteHandle` locally; the master never sees it.
    #[arg(long, default_value = "**/*")]
    pub glob_pattern: String,

    /// Consecutive suite failures/errors after which this worker sends
    /// `KABOOM` instead of popping again.
    #[arg(long)]
    pub early_failure_limit: Option<u32>,
}

impl Args {
    pub fn endpoint(&self) -> Result<Endpoint, distq_core::context::ParseEndpointError> {
        self.endpoint.parse()
    }
}
