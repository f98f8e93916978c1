// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers, ported from `oj-adapters::subprocess`.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for a single suite's `--list-suites` enumeration call.
pub const LIST_SUITES_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for running one suite.
pub const RUN_SUITE_TIMEOUT: Duration = Duration::from_secs(600);

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`, converting timeout
/// expiration into a descriptive error message. The child process is killed
/// when the returned future is dropped mid-wait, via tokio's `Child` drop
/// implementation.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{description} failed: {io_err}")),
        Err(_elapsed) => Err(format!(
            "{description} timed out after {}s",
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
