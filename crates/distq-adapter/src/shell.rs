// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The framework adapter trait and its production implementation.

use async_trait::async_trait;
use distq_core::{SuiteId, SuiteOutcome, SuiteResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

use crate::subprocess::{run_with_timeout, LIST_SUITES_TIMEOUT, RUN_SUITE_TIMEOUT};

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("enumerating suite files: {0}")]
    Enumerate(String),
    #[error("listing suites in {path}: {reason}", path = path.display())]
    ListSuites { path: PathBuf, reason: String },
    #[error("running suite {name} in {path}: {reason}", path = path.display())]
    RunSuite {
        name: String,
        path: PathBuf,
        reason: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A runnable suite inside a candidate file, as discovered by an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuiteHandle {
    pub name: String,
    pub path: PathBuf,
}

impl SuiteHandle {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn id(&self) -> SuiteId {
        SuiteId::new(self.name.clone(), self.path.clone())
    }
}

/// Everything the scheduler needs to know about a test framework, and
/// nothing more (spec.md §9's "capability set").
#[async_trait]
pub trait FrameworkAdapter: Send + Sync {
    /// List candidate files that may contain suites.
    async fn enumerate_suite_files(&self) -> Result<Vec<PathBuf>, AdapterError>;

    /// List the suites contained in one candidate file.
    async fn enumerate_suites(&self, path: &Path) -> Result<Vec<SuiteHandle>, AdapterError>;

    /// Run one suite and report its outcome.
    async fn run_suite(&self, handle: &SuiteHandle) -> Result<SuiteResult, AdapterError>;
}

/// The production adapter: candidate files are every file matched by a
/// configured glob, suites inside a file are discovered by running the
/// configured runner binary's `--list-suites` subcommand, and a suite is
/// executed by shelling out to the same binary with
/// `--run-suite <name> <path>`.
#[derive(Debug, Clone)]
pub struct ShellSuiteAdapter {
    glob_pattern: String,
    runner: PathBuf,
}

impl ShellSuiteAdapter {
    pub fn new(glob_pattern: impl Into<String>, runner: impl Into<PathBuf>) -> Self {
        Self {
            glob_pattern: glob_pattern.into(),
            runner: runner.into(),
        }
    }
}

#[async_trait]
impl FrameworkAdapter for ShellSuiteAdapter {
    async fn enumerate_suite_files(&self) -> Result<Vec<PathBuf>, AdapterError> {
        let pattern = self.glob_pattern.clone();
        tokio::task::spawn_blocking(move || {
            let mut paths = Vec::new();
            for entry in glob::glob(&pattern)
                .map_err(|e| AdapterError::Enumerate(e.to_string()))?
            {
                paths.push(entry.map_err(|e| AdapterError::Enumerate(e.to_string()))?);
            }
            Ok(paths)
        })
        .await
        .map_err(|e| AdapterError::Enumerate(e.to_string()))?
    }

    async fn enumerate_suites(&self, path: &Path) -> Result<Vec<SuiteHandle>, AdapterError> {
        let mut cmd = Command::new(&self.runner);
        cmd.arg("--list-suites")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = run_with_timeout(cmd, LIST_SUITES_TIMEOUT, "list-suites")
            .await
            .map_err(|reason| AdapterError::ListSuites {
                path: path.to_path_buf(),
                reason,
            })?;

        if !output.status.success() {
            return Err(AdapterError::ListSuites {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let names = String::from_utf8_lossy(&output.stdout);
        Ok(names
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| SuiteHandle::new(name, path))
            .collect())
    }

    async fn run_suite(&self, handle: &SuiteHandle) -> Result<SuiteResult, AdapterError> {
        let mut cmd = Command::new(&self.runner);
        cmd.arg("--run-suite")
            .arg(&handle.name)
            .arg(&handle.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = Instant::now();
        let output = run_with_timeout(cmd, RUN_SUITE_TIMEOUT, "run-suite")
            .await
            .map_err(|reason| AdapterError::RunSuite {
                name: handle.name.clone(),
                path: handle.path.clone(),
                reason,
            })?;
        let duration_seconds = started.elapsed().as_secs_f64();

        let outcome = if output.status.success() {
            SuiteOutcome::Pass
        } else {
            SuiteOutcome::Fail
        };

        let mut detail = output.stdout;
        detail.extend_from_slice(&output.stderr);

        Ok(SuiteResult {
            name: handle.name.clone(),
            path: handle.path.clone(),
            duration_seconds,
            outcome,
            detail,
        })
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
