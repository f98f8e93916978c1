// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The master dispatch loop (spec.md §4.1).
//!
//! Grounded on `daemon/src/listener/mod.rs`'s `Listener::run` /
//! `handle_connection` / `handle_request` shape, but diverging from its
//! "spawn a task per connection into shared mutex-protected state" style:
//! here one connection is accepted and handled synchronously per tick,
//! because the ordering guarantees in spec.md §5 depend on non-concurrent
//! command handling. Spawning a task per connection the way the teacher
//! daemon does would reintroduce the raciness the spec explicitly does not
//! want to hide behind claimed concurrency.

use std::time::{Duration, Instant};

use distq_core::RunContext;
use distq_protocol::{read_request, write_response, ProtocolError, Request, Response};
use tracing::{debug, info, warn};

use crate::conn::{Conn, MasterListener};
use crate::error::MasterError;
use crate::state::MasterState;
use crate::supervisor::WorkerSupervisor;

/// The 100ms readiness wait from spec.md §4.1 step 3.
pub const READINESS_POLL: Duration = Duration::from_millis(100);

/// Snapshot passed to the heartbeat callback every loop tick, for external
/// observers. Must not block (spec.md §4.1 step 1).
#[derive(Debug, Clone, Copy)]
pub struct Heartbeat {
    pub start_time: Instant,
    pub queue_size: usize,
    pub local_worker_count: usize,
    pub remote_worker_count: u32,
}

/// Why the dispatch loop stopped.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The queue emptied, discovery ended, and no remote worker remained.
    Finished,
    /// An operational error required an immediate, hard-killed stop.
    Aborted(MasterError),
}

/// Run the dispatch loop to completion. On return, `state.completed` holds
/// every local worker's finalized record and every relay-forwarded remote
/// record received so far; the caller is responsible for closing the
/// listener and deleting any Unix socket file (spec.md §4.5 step 7).
pub async fn run_dispatch_loop(
    listener: &MasterListener,
    ctx: &RunContext,
    state: &mut MasterState,
    supervisor: &mut WorkerSupervisor,
    mut on_heartbeat: impl FnMut(Heartbeat),
) -> Result<DispatchOutcome, MasterError> {
    let start_time = Instant::now();

    loop {
        if state.is_done() {
            supervisor.kill_all();
            state.completed.extend(supervisor.reap_blocking(ctx).await);
            return Ok(DispatchOutcome::Finished);
        }

        on_heartbeat(Heartbeat {
            start_time,
            queue_size: state.queue.len(),
            local_worker_count: supervisor.active_worker_count(),
            remote_worker_count: state.remote_workers,
        });

        if let Some(success) = supervisor.poll_discovery() {
            state.discovery_running = false;
            if !success {
                return abort(ctx, state, supervisor, MasterError::DiscoveryFailed).await;
            }
            if state.queue.awaiting_whitelist() {
                let missing: Vec<String> = state
                    .queue
                    .whitelist()
                    .awaited()
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                return abort(ctx, state, supervisor, MasterError::MissingForcedSuites(missing))
                    .await;
            }
        }

        match listener.accept_within(READINESS_POLL).await {
            Ok(Some(conn)) => {
                let was_awaiting = state.queue.awaiting_whitelist();
                match handle_connection(conn, ctx, state).await {
                    Ok(ShouldAbort::No) => {}
                    Ok(ShouldAbort::Yes) => {
                        return abort(ctx, state, supervisor, MasterError::Kaboom).await;
                    }
                    Err(e) => warn!(error = %e, "dropping connection after protocol error"),
                }
                if was_awaiting && !state.queue.awaiting_whitelist() {
                    supervisor.interrupt_discovery();
                }
            }
            Ok(None) => {
                state.completed.extend(supervisor.reap_nonblocking(ctx).await);
            }
            Err(e) => {
                warn!(error = %e, "listener accept error");
            }
        }
    }
}

enum ShouldAbort {
    No,
    Yes,
}

async fn handle_connection(
    mut conn: Conn,
    ctx: &RunContext,
    state: &mut MasterState,
) -> Result<ShouldAbort, ProtocolError> {
    let request = read_request(&mut conn, distq_protocol::DEFAULT_TIMEOUT).await?;

    if request.token() != &ctx.token {
        debug!("rejecting request with foreign run token");
        write_response(&mut conn, &Response::WrongRun, distq_protocol::DEFAULT_TIMEOUT).await?;
        return Ok(ShouldAbort::No);
    }

    match request {
        Request::Pop { .. } => {
            let response = if state.awaiting_suites() {
                Response::Wait
            } else {
                match state.queue.pop() {
                    Some(suite) => Response::Suite(suite),
                    None => Response::Done,
                }
            };
            write_response(&mut conn, &response, distq_protocol::DEFAULT_TIMEOUT).await?;
        }

        Request::Slave { concurrency, hostname, message, .. } => {
            info!(concurrency, %hostname, ?message, "relay announced remote workers");
            state.remote_workers += concurrency;
            write_response(&mut conn, &Response::Ok, distq_protocol::DEFAULT_TIMEOUT).await?;
        }

        Request::Worker { record, .. } => {
            state.remote_workers = state.remote_workers.saturating_sub(1);
            state.completed.push(record);
        }

        Request::NewSuite { suite, .. } => {
            state.queue.insert_discovered(suite);
        }

        Request::Kaboom { .. } => {
            state.aborting = true;
            return Ok(ShouldAbort::Yes);
        }
    }

    Ok(ShouldAbort::No)
}

async fn abort(
    ctx: &RunContext,
    state: &mut MasterState,
    supervisor: &mut WorkerSupervisor,
    reason: MasterError,
) -> Result<DispatchOutcome, MasterError> {
    state.aborting = true;
    supervisor.kill_all();
    state.completed.extend(supervisor.reap_blocking(ctx).await);
    Ok(DispatchOutcome::Aborted(reason))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
