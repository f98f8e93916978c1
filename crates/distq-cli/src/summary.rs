// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step 8 of the run driver's lifecycle: merge observed durations into the
//! stats store and print a short human summary (spec.md §4.5, §6.4).
//!
//! Deliberately plain stdout, not a TUI — spec.md §1 puts "terminal
//! formatting of the human summary" out of scope for the coordination core.

use distq_core::{format_elapsed_secs_f64, WorkerRecord};
use distq_stats::SuiteKey;

/// The saturating sum of every worker's exit status, clamped to 255
/// (spec.md §6.4, §8 "Saturating exit").
pub fn aggregate_exit_status(completed: &[WorkerRecord]) -> u8 {
    let sum: u32 = completed.iter().map(WorkerRecord::exit_status_or_failure).sum();
    sum.min(255) as u8
}

/// Every `(SuiteKey, duration)` pair observed across all completed workers,
/// for merging into the stats store (spec.md §4.5 step 8).
pub fn observed_durations(completed: &[WorkerRecord]) -> Vec<(SuiteKey, f64)> {
    completed
        .iter()
        .flat_map(|record| record.suites_run.iter())
        .map(|result| (SuiteKey::from(&result.id()), result.duration_seconds))
        .collect()
}

/// Print the run's summary: one line per worker, then totals.
pub fn print_summary(completed: &[WorkerRecord]) {
    for record in completed {
        let status = record
            .exit_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".to_string());
        let elapsed = record
            .elapsed_seconds()
            .map(format_elapsed_secs_f64)
            .unwrap_or_else(|| "?".to_string());
        println!(
            "worker {} (pid {}, host {}): exit={status} in {elapsed} {}",
            record.num, record.pid, record.host, record.summary_text
        );
        if !record.failure_text.is_empty() {
            println!("  failing: {}", record.failure_text);
        }
    }

    let total_suites: usize = completed.iter().map(|r| r.suites_run.len()).sum();
    println!(
        "{} worker(s), {total_suites} suite(s) run, exit status {}",
        completed.len(),
        aggregate_exit_status(completed)
    );
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
