// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker record: the per-worker bookkeeping the master maintains from fork
//! to reap, and forwards wholesale across a relay.

use crate::suite::SuiteResult;
use chrono::{DateTime, Utc};

/// A forked (or remote) worker's lifecycle record.
///
/// Created at fork with `end_time`/`exit_status`/`suites_run` unset, then
/// completed at reap time. Relays forward the finalized record to the
/// primary over the wire; the shape therefore must be fully portable
/// (no PIDs that only make sense to forward across a single host's reaper,
/// though `pid` is kept for diagnostics since it is still meaningful on the
/// host it ran on).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct WorkerRecord {
    /// Index of this worker within its host's concurrency (0-based).
    pub num: u32,
    /// OS process id on the host that forked it.
    pub pid: u32,
    /// Hostname the worker ran on (own host for local workers, the relay's
    /// announced hostname for remote ones).
    pub host: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Process exit status (0 on success). `None` until reaped.
    pub exit_status: Option<i32>,
    pub captured_stdout: String,
    pub summary_text: String,
    pub failure_text: String,
    pub suites_run: Vec<SuiteResult>,
}

impl WorkerRecord {
    /// Create a record for a just-forked worker.
    pub fn started(num: u32, pid: u32, host: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            num,
            pid,
            host: host.into(),
            start_time,
            end_time: None,
            exit_status: None,
            captured_stdout: String::new(),
            summary_text: String::new(),
            failure_text: String::new(),
            suites_run: Vec::new(),
        }
    }

    /// True once the worker has been reaped.
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    /// Saturating, clamped-to-255 exit status used to fold into the run's
    /// overall exit code. A worker that was never reaped (shouldn't happen
    /// once the run driver finishes) counts as a failure.
    pub fn exit_status_or_failure(&self) -> u32 {
        self.exit_status.map(|s| s.max(0) as u32).unwrap_or(1)
    }

    /// Wall-clock seconds between fork and reap, `None` until finished.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        let end_time = self.end_time?;
        Some((end_time - self.start_time).num_milliseconds().max(0) as f64 / 1000.0)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
