// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use distq_core::{Queue, WorkerRecord};

/// Mutable run state, owned exclusively by the dispatch loop (spec.md §5:
/// "single-threaded cooperative event loop... needs no locking").
pub struct MasterState {
    pub queue: Queue,
    pub completed: Vec<WorkerRecord>,
    /// Remote workers announced by relays but not yet reported finished,
    /// per spec.md §4.4.
    pub remote_workers: u32,
    pub discovery_running: bool,
    /// Set once a `KABOOM` or discovery failure is observed; suppresses
    /// further completions from being recorded (spec.md §5 "Cancellation").
    pub aborting: bool,
}

impl MasterState {
    pub fn new(queue: Queue, discovery_running: bool) -> Self {
        Self {
            queue,
            completed: Vec::new(),
            remote_workers: 0,
            discovery_running,
            aborting: false,
        }
    }

    /// spec.md §4.1: true while a `POP` should receive `WAIT` rather than
    /// draining the queue.
    pub fn awaiting_suites(&self) -> bool {
        self.queue.awaiting_whitelist() || (self.queue.is_empty() && self.discovery_running)
    }

    /// spec.md §4.1 termination condition.
    pub fn is_done(&self) -> bool {
        !self.awaiting_suites() && self.queue.is_empty() && self.remote_workers == 0
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
