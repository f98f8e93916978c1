// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! distq: the run driver that orchestrates one distributed test run
//! (spec.md §4.5).

mod cli;
mod driver;
mod summary;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match driver::run(args).await {
        Ok(exit_status) => std::process::exit(exit_status as i32),
        Err(err) => {
            tracing::error!(error = %err, "run aborted");
            std::process::exit(255);
        }
    }
}
