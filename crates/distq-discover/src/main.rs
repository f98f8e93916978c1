// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! distq-discover: walks the framework adapter's candidate files and reports
//! every suite it finds to the master, stopping gracefully on `SIGINT` once
//! the master no longer needs further discovery (spec.md §4.3).

mod cli;
mod run;

use clap::Parser;
use distq_adapter::ShellSuiteAdapter;
use distq_core::RunToken;
use run::discover;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
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

    let token = RunToken::from_hex(args.token.clone());
    let adapter = ShellSuiteAdapter::new(args.glob_pattern.clone(), args.runner.clone());

    let terminate = Arc::new(AtomicBool::new(false));
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(sigint) => sigint,
        Err(err) => {
            tracing::error!(error = %err, "failed to install SIGINT handler");
            std::process::exit(1);
        }
    };
    let watcher_flag = terminate.clone();
    tokio::spawn(async move {
        sigint.recv().await;
        tracing::info!("discovery received SIGINT, winding down");
        watcher_flag.store(true, Ordering::SeqCst);
    });

    match discover(&adapter, &token, &endpoint, &terminate).await {
        Ok(reported) => {
            tracing::info!(reported, "discovery finished");
            std::process::exit(0);
        }
        Err(err) => {
            tracing::error!(error = %err, "discovery aborted by a wire error");
            std::process::exit(1);
        }
    }
}
