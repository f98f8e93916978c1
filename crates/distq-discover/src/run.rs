// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The discovery walk: enumerate every candidate file, then every suite
//! inside it, reporting each to the master as it's found. Checks a
//! termination flag between suites so an `INT` (sent once the whitelist is
//! fully satisfied) stops the walk promptly without losing already-reported
//! suites (spec.md §4.3).

use distq_adapter::FrameworkAdapter;
use distq_core::{Endpoint, RunToken};
use distq_master::Conn;
use distq_protocol::{write_request, ProtocolError, Request};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Walk every candidate file and report every suite found in it, stopping
/// early if `terminate` flips to true between suites. Returns the count of
/// suites reported.
pub async fn discover(
    adapter: &dyn FrameworkAdapter,
    token: &RunToken,
    endpoint: &Endpoint,
    terminate: &Arc<AtomicBool>,
) -> Result<usize, ProtocolError> {
    let files = adapter
        .enumerate_suite_files()
        .await
        .map_err(|e| ProtocolError::Io(std::io::Error::other(e)))?;

    let mut reported = 0;
    for path in files {
        if terminate.load(Ordering::SeqCst) {
            break;
        }

        let suites = adapter
            .enumerate_suites(&path)
            .await
            .map_err(|e| ProtocolError::Io(std::io::Error::other(e)))?;

        for handle in suites {
            if terminate.load(Ordering::SeqCst) {
                return Ok(reported);
            }
            report_suite(token, endpoint, handle.id()).await?;
            reported += 1;
        }
    }

    Ok(reported)
}

async fn report_suite(
    token: &RunToken,
    endpoint: &Endpoint,
    suite: distq_core::SuiteId,
) -> Result<(), ProtocolError> {
    let mut conn = Conn::connect(endpoint).await?;
    let request = Request::NewSuite {
        token: token.clone(),
        suite,
    };
    write_request(&mut conn, &request, distq_protocol::DEFAULT_TIMEOUT).await
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
