// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! distq-worker: a forked child that pops suites from the master one at a
//! time, executes them via a framework adapter, and reports its captured
//! output and results through scratch files at exit (spec.md §4.2).

mod cli;
mod run;

use clap::Parser;
use distq_adapter::ShellSuiteAdapter;
use distq_core::RunToken;
use run::{pop_loop, write_scratch_files, WorkerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let endpoint = match args.endpoint() {
        Ok(endpoint) => endpoint,
        Err(err) => {
            tracing::error!(error = %err, "invalid --endpoint");
            std::process::exit(1);
        }
    };

    let config = WorkerConfig {
        token: RunToken::from_hex(args.token.clone()),
        endpoint,
        early_failure_limit: args.early_failure_limit,
    };
    let adapter = ShellSuiteAdapter::new(args.glob_pattern.clone(), args.runner.clone());

    tracing::info!(num = args.num, host = %args.host, "worker starting");

    let outcome = match pop_loop(&config, &adapter).await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(error = %err, "worker lost connection to master");
            std::process::exit(1);
        }
    };

    let pid = std::process::id();
    let output_path = distq_core::worker_output_path(&args.scratch_dir, pid);
    let suites_path = distq_core::worker_suites_path(&args.scratch_dir, pid);
    if let Err(err) = write_scratch_files(&output_path, &suites_path, &outcome) {
        tracing::error!(error = %err, "failed to write scratch files");
        std::process::exit(1);
    }

    tracing::info!(
        suites_run = outcome.suites_run.len(),
        kaboom = outcome.kaboom,
        "worker finished"
    );
    std::process::exit(outcome.exit_code());
}
