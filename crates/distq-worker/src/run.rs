// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The worker's POP loop: connect, request a suite, run it, repeat, until
//! `Done` or early-failure escalation (spec.md §4's Worker row, §6.2).

use distq_adapter::{FrameworkAdapter, SuiteHandle};
use distq_core::{Endpoint, RunToken, SuiteResult};
use distq_master::Conn;
use distq_protocol::{read_response, write_request, ProtocolError, Request, Response};
use std::path::Path;

/// Everything a single worker loop needs, fixed for its whole run.
pub struct WorkerConfig {
    pub token: RunToken,
    pub endpoint: Endpoint,
    pub early_failure_limit: Option<u32>,
}

/// What the loop accumulated once it stops, written out by the caller.
pub struct WorkerOutcome {
    pub captured_stdout: String,
    pub suites_run: Vec<SuiteResult>,
    pub kaboom: bool,
}

impl WorkerOutcome {
    /// Zero if every suite this worker ran passed; nonzero otherwise. This
    /// convention is not spelled out in spec.md — a worker's process exit
    /// status is the unit the driver sums, so it must distinguish a clean
    /// run from one that reported failures.
    pub fn exit_code(&self) -> i32 {
        if self.kaboom || self.suites_run.iter().any(|r| !r.outcome.is_pass()) {
            1
        } else {
            0
        }
    }
}

/// Run the POP loop against an adapter until the master says `Done`, a
/// connection-level protocol error occurs, or early-failure escalation fires.
pub async fn pop_loop(
    config: &WorkerConfig,
    adapter: &dyn FrameworkAdapter,
) -> Result<WorkerOutcome, ProtocolError> {
    let mut captured_stdout = String::new();
    let mut suites_run = Vec::new();
    let mut consecutive_failures = 0u32;
    let mut kaboom = false;

    loop {
        let response = pop(config).await?;
        match response {
            Response::Done | Response::WrongRun => break,
            Response::Wait => {
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                continue;
            }
            Response::Ok => continue,
            Response::Suite(id) => {
                let handle = SuiteHandle::new(id.name, id.path);
                let result = run_one(adapter, &handle).await;

                captured_stdout.push_str(&format!(
                    "--- {} ({}) ---\n{}\n",
                    handle.name,
                    handle.path.display(),
                    String::from_utf8_lossy(&result.detail)
                ));

                if result.outcome.is_pass() {
                    consecutive_failures = 0;
                } else {
                    consecutive_failures += 1;
                }
                suites_run.push(result);

                if let Some(limit) = config.early_failure_limit {
                    if consecutive_failures >= limit {
                        kaboom = true;
                        send_kaboom(config).await?;
                        break;
                    }
                }
            }
        }
    }

    Ok(WorkerOutcome {
        captured_stdout,
        suites_run,
        kaboom,
    })
}

async fn pop(config: &WorkerConfig) -> Result<Response, ProtocolError> {
    let mut conn = Conn::connect(&config.endpoint).await?;
    let request = Request::Pop {
        token: config.token.clone(),
    };
    write_request(&mut conn, &request, distq_protocol::DEFAULT_TIMEOUT).await?;
    read_response(&mut conn, distq_protocol::DEFAULT_TIMEOUT).await
}

async fn send_kaboom(config: &WorkerConfig) -> Result<(), ProtocolError> {
    let mut conn = Conn::connect(&config.endpoint).await?;
    let request = Request::Kaboom {
        token: config.token.clone(),
    };
    write_request(&mut conn, &request, distq_protocol::DEFAULT_TIMEOUT).await
}

/// Run a suite, converting an adapter error into a synthetic `Error` result
/// rather than propagating — one suite's crash must not take down the
/// worker's connection to the master.
async fn run_one(adapter: &dyn FrameworkAdapter, handle: &SuiteHandle) -> SuiteResult {
    match adapter.run_suite(handle).await {
        Ok(result) => result,
        Err(err) => SuiteResult {
            name: handle.name.clone(),
            path: handle.path.clone(),
            duration_seconds: 0.0,
            outcome: distq_core::SuiteOutcome::Error,
            detail: err.to_string().into_bytes(),
        },
    }
}

/// Write the two scratch files the master reads at reap time (spec.md §4's
/// Shared resources note).
pub fn write_scratch_files(
    output_path: &Path,
    suites_path: &Path,
    outcome: &WorkerOutcome,
) -> std::io::Result<()> {
    std::fs::write(output_path, &outcome.captured_stdout)?;
    let json = serde_json::to_vec(&outcome.suites_run)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(suites_path, json)?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
