// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fork, reap, and kill local worker and discovery processes (spec.md §4.2).
//!
//! Grounded on `cli/src/daemon_process.rs`'s PID-tracking and
//! `force_kill_daemon` pattern, generalized from "one daemon process" to "N
//! worker processes in a table," and using `tokio::process::Child::try_wait`
//! for async non-blocking reaping instead of the teacher CLI's synchronous
//! `kill -0` polling loop.

use chrono::Utc;
use distq_core::{RunContext, SuiteResult, WorkerRecord};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::io;
use std::path::PathBuf;
use tokio::process::{Child, Command};

/// What to spawn: the worker/discovery binary path and its arguments.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

struct TrackedWorker {
    child: Child,
    pid: u32,
    num: u32,
    host: String,
    start_time: chrono::DateTime<Utc>,
}

/// Owns every forked worker and the discovery child for one run.
pub struct WorkerSupervisor {
    workers: Vec<TrackedWorker>,
    discovery: Option<Child>,
    discovery_pid: Option<u32>,
}

impl Default for WorkerSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerSupervisor {
    pub fn new() -> Self {
        Self {
            workers: Vec::new(),
            discovery: None,
            discovery_pid: None,
        }
    }

    pub fn active_worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn discovery_running(&self) -> bool {
        self.discovery.is_some()
    }

    /// Fork one worker. `num` is the worker's ordinal (1..=concurrency),
    /// distinct from its OS pid.
    pub fn spawn_worker(&mut self, spec: &SpawnSpec, num: u32, host: &str) -> io::Result<u32> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        let child = cmd.spawn()?;
        let pid = child
            .id()
            .ok_or_else(|| io::Error::other("spawned worker has no pid"))?;

        self.workers.push(TrackedWorker {
            child,
            pid,
            num,
            host: host.to_string(),
            start_time: Utc::now(),
        });
        Ok(pid)
    }

    pub fn spawn_discovery(&mut self, spec: &SpawnSpec) -> io::Result<u32> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        let child = cmd.spawn()?;
        let pid = child
            .id()
            .ok_or_else(|| io::Error::other("spawned discovery has no pid"))?;
        self.discovery = Some(child);
        self.discovery_pid = Some(pid);
        Ok(pid)
    }

    /// Non-blockingly check whether discovery has exited.
    ///
    /// Returns `Some(true)` if it exited successfully, `Some(false)` if it
    /// exited non-successfully, `None` if it is still running or was never
    /// started.
    pub fn poll_discovery(&mut self) -> Option<bool> {
        let child = self.discovery.as_mut()?;
        match child.try_wait() {
            Ok(Some(status)) => {
                self.discovery = None;
                self.discovery_pid = None;
                Some(status.success())
            }
            _ => None,
        }
    }

    /// Non-blockingly reap any exited local workers, returning their
    /// finalized records (spec.md §4.2 "Reap").
    pub async fn reap_nonblocking(&mut self, ctx: &RunContext) -> Vec<WorkerRecord> {
        let mut reaped = Vec::new();
        let mut remaining = Vec::new();

        for mut tracked in self.workers.drain(..) {
            match tracked.child.try_wait() {
                Ok(Some(status)) => {
                    reaped.push(finalize(ctx, &tracked, status.code()));
                }
                Ok(None) => remaining.push(tracked),
                Err(_) => remaining.push(tracked),
            }
        }

        self.workers = remaining;
        reaped
    }

    /// Blocking reap of every still-running worker, used on shutdown
    /// (spec.md §4.2 "Reap: ... blocking on shutdown").
    pub async fn reap_blocking(&mut self, ctx: &RunContext) -> Vec<WorkerRecord> {
        let mut reaped = Vec::new();
        for mut tracked in self.workers.drain(..) {
            let status = tracked.child.wait().await.ok();
            reaped.push(finalize(ctx, &tracked, status.and_then(|s| s.code())));
        }
        reaped
    }

    /// Send `KILL` to every tracked worker and discovery PID (spec.md §4.2
    /// "Kill"). Never sends graceful signals — workers are expected to be
    /// independently interruptible by losing the master connection.
    pub fn kill_all(&mut self) {
        for tracked in &self.workers {
            let _ = signal::kill(Pid::from_raw(tracked.pid as i32), Signal::SIGKILL);
        }
        if let Some(pid) = self.discovery_pid {
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
        }
    }

    /// Send `INT` to discovery once the whitelist is fully satisfied
    /// (spec.md §4.3: "The master kills the discovery subprocess with `INT`
    /// (graceful) when the whitelist becomes fully satisfied").
    pub fn interrupt_discovery(&self) {
        if let Some(pid) = self.discovery_pid {
            let _ = signal::kill(Pid::from_raw(pid as i32), Signal::SIGINT);
        }
    }
}

/// Build a finalized `WorkerRecord` from a reaped child: read-and-delete its
/// stdout capture file and serialized-suites file, stamp `end_time` and
/// `exit_status`.
fn finalize(ctx: &RunContext, tracked: &TrackedWorker, exit_status: Option<i32>) -> WorkerRecord {
    let output_path = ctx.worker_output_path(tracked.pid);
    let suites_path = ctx.worker_suites_path(tracked.pid);

    let captured_stdout = std::fs::read_to_string(&output_path).unwrap_or_default();
    let _ = std::fs::remove_file(&output_path);

    let suites_run: Vec<SuiteResult> = std::fs::read(&suites_path)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default();
    let _ = std::fs::remove_file(&suites_path);

    let failing: Vec<&str> = suites_run
        .iter()
        .filter(|r| !r.outcome.is_pass())
        .map(|r| r.name.as_str())
        .collect();
    let failure_text = failing.join(", ");
    let summary_text = format!(
        "{} suite(s) run, {} failing",
        suites_run.len(),
        failing.len()
    );

    let mut record = WorkerRecord::started(
        tracked.num,
        tracked.pid,
        tracked.host.clone(),
        tracked.start_time,
    );
    record.end_time = Some(Utc::now());
    record.exit_status = exit_status;
    record.captured_stdout = captured_stdout;
    record.summary_text = summary_text;
    record.failure_text = failure_text;
    record.suites_run = suites_run;
    record
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
