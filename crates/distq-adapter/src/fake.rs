// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake adapter for deterministic tests of the master and driver without
//! subprocesses, following the `FakeSessionAdapter` pattern in
//! `oj-adapters::session::fake`.

use crate::shell::{AdapterError, FrameworkAdapter, SuiteHandle};
use async_trait::async_trait;
use distq_core::{SuiteOutcome, SuiteResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A recorded call into the fake, for assertions in tests that exercise the
/// master or driver against it.
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteCall {
    EnumerateFiles,
    EnumerateSuites { path: PathBuf },
    RunSuite { handle: SuiteHandle },
}

struct FakeState {
    files: Vec<PathBuf>,
    suites: HashMap<PathBuf, Vec<SuiteHandle>>,
    outcomes: HashMap<SuiteHandle, SuiteOutcome>,
    durations: HashMap<SuiteHandle, f64>,
    calls: Vec<SuiteCall>,
}

/// In-memory `path -> Vec<suite name>` map for tests, with configurable
/// outcomes and durations per suite.
#[derive(Clone)]
pub struct FakeSuiteAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl Default for FakeSuiteAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeState {
                files: Vec::new(),
                suites: HashMap::new(),
                outcomes: HashMap::new(),
                durations: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeSuiteAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a candidate file containing the given suite names.
    pub fn add_file(&self, path: impl Into<PathBuf>, suite_names: &[&str]) {
        let path = path.into();
        let mut state = self.inner.lock();
        state.files.push(path.clone());
        let handles = suite_names
            .iter()
            .map(|name| SuiteHandle::new(*name, path.clone()))
            .collect();
        state.suites.insert(path, handles);
    }

    /// Override the outcome a suite reports when run. Defaults to `Pass`.
    pub fn set_outcome(&self, handle: &SuiteHandle, outcome: SuiteOutcome) {
        self.inner.lock().outcomes.insert(handle.clone(), outcome);
    }

    /// Override the duration a suite reports when run. Defaults to `0.0`.
    pub fn set_duration(&self, handle: &SuiteHandle, seconds: f64) {
        self.inner.lock().durations.insert(handle.clone(), seconds);
    }

    pub fn calls(&self) -> Vec<SuiteCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl FrameworkAdapter for FakeSuiteAdapter {
    async fn enumerate_suite_files(&self) -> Result<Vec<PathBuf>, AdapterError> {
        let mut state = self.inner.lock();
        state.calls.push(SuiteCall::EnumerateFiles);
        Ok(state.files.clone())
    }

    async fn enumerate_suites(&self, path: &Path) -> Result<Vec<SuiteHandle>, AdapterError> {
        let mut state = self.inner.lock();
        state.calls.push(SuiteCall::EnumerateSuites {
            path: path.to_path_buf(),
        });
        Ok(state.suites.get(path).cloned().unwrap_or_default())
    }

    async fn run_suite(&self, handle: &SuiteHandle) -> Result<SuiteResult, AdapterError> {
        let mut state = self.inner.lock();
        state.calls.push(SuiteCall::RunSuite {
            handle: handle.clone(),
        });
        let outcome = state
            .outcomes
            .get(handle)
            .copied()
            .unwrap_or(SuiteOutcome::Pass);
        let duration_seconds = state.durations.get(handle).copied().unwrap_or(0.0);

        Ok(SuiteResult {
            name: handle.name.clone(),
            path: handle.path.clone(),
            duration_seconds,
            outcome,
            detail: Vec::new(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
