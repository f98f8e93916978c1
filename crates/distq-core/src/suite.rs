// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suite identity and the records that travel over the wire and into the
//! stats store.

use std::path::PathBuf;

/// A suite identity: `name` uniquely identifies a suite inside file `path`.
///
/// This is the queue element and the unit of dispatch. Two `SuiteId`s are
/// equal only if both `name` and `path` match, so the same suite name in two
/// different files is two distinct queue entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SuiteId {
    pub name: String,
    pub path: PathBuf,
}

impl SuiteId {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A stats-store entry: the last observed duration for a suite.
///
/// Durations from the current run overwrite these at shutdown; they exist
/// only to seed the initial queue order.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SuiteRecord {
    pub name: String,
    pub path: PathBuf,
    pub duration_seconds: f64,
}

impl SuiteRecord {
    pub fn id(&self) -> SuiteId {
        SuiteId::new(self.name.clone(), self.path.clone())
    }
}

/// Outcome of a single suite's execution, as reported by a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteOutcome {
    Pass,
    Fail,
    Error,
}

impl SuiteOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, SuiteOutcome::Pass)
    }
}

/// The result of running one suite, reported by a worker to the master.
///
/// `detail` is an opaque, framework-specific byte blob (e.g. captured
/// assertion output) — the master never interprets it, only stores and
/// forwards it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub outcome: SuiteOutcome,
    #[serde(default)]
    pub detail: Vec<u8>,
}

impl SuiteResult {
    pub fn id(&self) -> SuiteId {
        SuiteId::new(self.name.clone(), self.path.clone())
    }

    pub fn as_record(&self) -> SuiteRecord {
        SuiteRecord {
            name: self.name.clone(),
            path: self.path.clone(),
            duration_seconds: self.duration_seconds,
        }
    }
}

#[cfg(test)]
#[path = "suite_tests.rs"]
mod tests;
