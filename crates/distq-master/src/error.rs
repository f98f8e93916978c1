// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operational-abort reasons the dispatch loop raises, per spec.md §7's
//! taxonomy. Connection-level faults — a bad token, a malformed message, a
//! connection lost mid-read — are that taxonomy's "protocol errors", which
//! are dropped and logged inline by `dispatch::handle_connection` and never
//! promoted to a `MasterError`; only the taxonomy's "subprocess errors" and
//! "operational errors" reach here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MasterError {
    #[error("discovery process exited non-successfully")]
    DiscoveryFailed,

    #[error("missing forced suites: {0:?}")]
    MissingForcedSuites(Vec<String>),

    #[error("worker signaled kaboom: aborting run")]
    Kaboom,
}
