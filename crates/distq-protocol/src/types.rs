// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use distq_core::{RunToken, SuiteId, WorkerRecord};
use serde::{Deserialize, Serialize};

/// Request from a worker, discovery child, or relay to the master
/// (spec.md §6.2's command table).
///
/// Every variant carries the run token explicitly — the analogue of the
/// `TOKEN=<hex>` prefix spec.md puts on every textual wire line. A token
/// mismatch never reaches a handler: `distq-master`'s connection loop checks
/// it up front and replies `Response::WrongRun` without matching on the
/// command at all (spec.md §8's "Token isolation" property).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Request the next suite to run.
    Pop { token: RunToken },

    /// A relay announces `concurrency` incoming remote workers.
    Slave {
        token: RunToken,
        concurrency: u32,
        hostname: String,
        #[serde(default)]
        message: Option<String>,
    },

    /// A relay forwards a finalized remote worker record.
    Worker {
        token: RunToken,
        record: WorkerRecord,
    },

    /// The discovery child reports a suite it found on disk.
    NewSuite { token: RunToken, suite: SuiteId },

    /// A worker signals early-failure escalation; the dispatch loop stops.
    Kaboom { token: RunToken },
}

impl Request {
    pub fn token(&self) -> &RunToken {
        match self {
            Request::Pop { token }
            | Request::Slave { token, .. }
            | Request::Worker { token, .. }
            | Request::NewSuite { token, .. }
            | Request::Kaboom { token } => token,
        }
    }
}

/// Response from the master back to a requester.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// The next suite to run.
    Suite(SuiteId),
    /// Awaiting whitelist resolution or late discovery; poll again.
    Wait,
    /// The run is finished; the worker should exit cleanly.
    Done,
    /// Acknowledges a `Slave` or similar request with no payload to return.
    Ok,
    /// The presented token does not match this run's token.
    WrongRun,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
