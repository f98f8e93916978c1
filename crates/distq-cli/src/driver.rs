// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The run driver: spec.md §4.5's linear lifecycle, with cleanup guaranteed
//! on every exit path.

use distq_adapter::{FrameworkAdapter, ShellSuiteAdapter};
use distq_core::{Endpoint, RelayConfig, RunContext, RunToken};
use distq_master::relay::{connect_with_backoff, forward_worker_record, handshake};
use distq_master::supervisor::SpawnSpec;
use distq_master::{run_dispatch_loop, DispatchOutcome, Heartbeat, MasterError, MasterListener, MasterState, WorkerSupervisor};
use distq_stats::{merge_durations, JsonStatsStore, StatsStore, SuiteKey};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::cli::Args;
use crate::summary::{aggregate_exit_status, observed_durations, print_summary};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Master(#[from] MasterError),
    #[error("relay error: {0}")]
    Relay(#[from] distq_master::relay::RelayError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stats error: {0}")]
    Stats(#[from] distq_stats::StatsError),
    #[error("bad --listen-endpoint or --relay-endpoint: {0}")]
    BadEndpoint(String),
}

/// Build the immutable per-run context from parsed CLI arguments.
pub fn build_context(args: &Args) -> Result<RunContext, DriverError> {
    let concurrency = args.concurrency.unwrap_or_else(default_concurrency);

    let token = match &args.relay_token {
        Some(hex) => RunToken::from_hex(hex.clone()),
        None => RunToken::generate(),
    };

    let listen_endpoint = match &args.listen_endpoint {
        Some(s) => s
            .parse::<Endpoint>()
            .map_err(|e| DriverError::BadEndpoint(e.to_string()))?,
        None => default_listen_endpoint(&args.scratch_dir, &token),
    };

    let relay = match &args.relay_endpoint {
        Some(addr) => {
            let candidate = parse_relay_endpoint(addr, args)?;
            if relay_targets_self(&candidate, &listen_endpoint) {
                warn!(
                    relay_endpoint = addr,
                    listen_endpoint = %listen_endpoint,
                    "relay-endpoint equals this process's own listen-endpoint; disabling relay mode and running as primary"
                );
                None
            } else {
                Some(candidate)
            }
        }
        None => None,
    };

    Ok(RunContext {
        token,
        scratch_dir: args.scratch_dir.clone(),
        concurrency,
        whitelist: args.whitelist.clone(),
        listen_endpoint,
        relay,
        stats_file_path: args.stats_file_path.clone(),
        early_failure_limit: args.early_failure_limit,
        verbose: args.verbose,
    })
}

fn default_concurrency() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(2)
}

fn default_listen_endpoint(scratch_dir: &Path, token: &RunToken) -> Endpoint {
    let filename = format!("test_queue_{}_{}.sock", std::process::id(), token);
    Endpoint::Unix(scratch_dir.join(filename))
}

/// True if `relay`'s primary address is this same process's own listen
/// endpoint (spec.md §6.3: "if equal to own endpoint, relay mode is
/// disabled with a warning"). Only possible when this process itself
/// listens on TCP — a relay target is always `host:port` and can never
/// coincide with a Unix socket path.
fn relay_targets_self(relay: &RelayConfig, listen_endpoint: &Endpoint) -> bool {
    match listen_endpoint {
        Endpoint::Tcp { port, .. } => {
            relay.primary_port == *port && relay.primary_host == listen_endpoint.host_or_default()
        }
        Endpoint::Unix(_) => false,
    }
}

fn parse_relay_endpoint(addr: &str, args: &Args) -> Result<RelayConfig, DriverError> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| DriverError::BadEndpoint(addr.to_string()))?;
    let port: u16 = port
        .parse()
        .map_err(|_| DriverError::BadEndpoint(addr.to_string()))?;
    let mut relay = RelayConfig::new(host, port);
    relay.connect_timeout = std::time::Duration::from_secs(args.relay_connect_timeout_seconds);
    relay.slave_message = args.slave_message.clone().map(|m| m.replace('\n', " "));
    Ok(relay)
}

fn hostname(args: &Args) -> String {
    args.hostname.clone().unwrap_or_else(|| {
        hostname_from_env().unwrap_or_else(|| "unknown-host".to_string())
    })
}

fn hostname_from_env() -> Option<String> {
    std::env::var("HOSTNAME").ok().filter(|s| !s.is_empty())
}

fn worker_spawn_spec(args: &Args, ctx: &RunContext, num: u32, endpoint: &Endpoint) -> SpawnSpec {
    let mut spawn_args = vec![
        "--token".to_string(),
        ctx.token.to_string(),
        "--num".to_string(),
        num.to_string(),
        "--host".to_string(),
        hostname(args),
        "--endpoint".to_string(),
        endpoint.to_string(),
        "--scratch-dir".to_string(),
        ctx.scratch_dir.display().to_string(),
        "--runner".to_string(),
        args.runner.display().to_string(),
        "--glob-pattern".to_string(),
        args.glob_pattern.clone(),
    ];
    if let Some(limit) = ctx.early_failure_limit {
        spawn_args.push("--early-failure-limit".to_string());
        spawn_args.push(limit.to_string());
    }
    SpawnSpec {
        program: args.worker_bin.clone(),
        args: spawn_args,
    }
}

fn discover_spawn_spec(args: &Args, ctx: &RunContext) -> SpawnSpec {
    SpawnSpec {
        program: args.discover_bin.clone(),
        args: vec![
            "--token".to_string(),
            ctx.token.to_string(),
            "--endpoint".to_string(),
            ctx.listen_endpoint.to_string(),
            "--runner".to_string(),
            args.runner.display().to_string(),
            "--glob-pattern".to_string(),
            args.glob_pattern.clone(),
        ],
    }
}

/// Run the full lifecycle and return the process exit code (spec.md §6.4).
pub async fn run(args: Args) -> Result<u8, DriverError> {
    let ctx = build_context(&args)?;
    let adapter = ShellSuiteAdapter::new(args.glob_pattern.clone(), args.runner.clone());

    if ctx.is_relay() {
        run_relay(&args, &ctx, &adapter).await
    } else {
        run_primary(&args, &ctx, &adapter).await
    }
}

async fn run_primary(
    args: &Args,
    ctx: &RunContext,
    adapter: &dyn FrameworkAdapter,
) -> Result<u8, DriverError> {
    let stats_store = JsonStatsStore;
    let durations = stats_store.load(&ctx.stats_file_path)?;

    let whitelist = distq_core::Whitelist::new(ctx.whitelist.clone());
    let mut queue = distq_core::Queue::new(whitelist);
    queue.seed(seed_pairs(adapter, &durations).await?);

    let needs_discovery = queue.whitelist().is_empty() || !queue.whitelist().is_satisfied();
    let mut state = MasterState::new(queue, needs_discovery);

    let listener = MasterListener::bind(&ctx.listen_endpoint).await?;
    info!(endpoint = %ctx.listen_endpoint, "primary listening");

    let mut supervisor = WorkerSupervisor::new();
    if needs_discovery {
        supervisor.spawn_discovery(&discover_spawn_spec(args, ctx))?;
        info!("discovery subprocess started");
    }

    for num in 0..ctx.concurrency {
        supervisor.spawn_worker(
            &worker_spawn_spec(args, ctx, num, &ctx.listen_endpoint),
            num,
            &hostname(args),
        )?;
    }
    info!(concurrency = ctx.concurrency, "workers started");

    let outcome = run_dispatch_loop(&listener, ctx, &mut state, &mut supervisor, |hb: Heartbeat| {
        if args.verbose {
            info!(
                queue_size = hb.queue_size,
                local_workers = hb.local_worker_count,
                remote_workers = hb.remote_worker_count,
                "heartbeat"
            );
        }
    })
    .await?;

    if let Some(path) = listener.socket_path() {
        let _ = std::fs::remove_file(path);
    }

    match &outcome {
        DispatchOutcome::Finished => info!("run finished"),
        DispatchOutcome::Aborted(reason) => warn!(%reason, "run aborted"),
    }

    let merged = merge_durations(&durations, observed_durations(&state.completed));
    stats_store.save(&ctx.stats_file_path, &merged)?;

    print_summary(&state.completed);

    Ok(match outcome {
        DispatchOutcome::Finished => aggregate_exit_status(&state.completed),
        DispatchOutcome::Aborted(_) => 255,
    })
}

async fn run_relay(
    args: &Args,
    ctx: &RunContext,
    _adapter: &dyn FrameworkAdapter,
) -> Result<u8, DriverError> {
    let relay = ctx
        .relay
        .as_ref()
        .ok_or_else(|| DriverError::BadEndpoint("run_relay called with no relay config".to_string()))?;

    let mut stream = connect_with_backoff(relay).await?;
    handshake(&mut stream, ctx, relay, &hostname(args)).await?;
    info!(primary = %relay.primary_host, "relay handshake complete");

    let mut supervisor = WorkerSupervisor::new();
    let primary_endpoint = Endpoint::tcp(relay.primary_host.clone(), relay.primary_port);
    for num in 0..ctx.concurrency {
        supervisor.spawn_worker(
            &worker_spawn_spec(args, ctx, num, &primary_endpoint),
            num,
            &hostname(args),
        )?;
    }
    info!(concurrency = ctx.concurrency, "remote workers started");

    // Poll non-blockingly and forward each remote worker's record the moment
    // it reaps, rather than waiting for the whole batch: spec.md §4.4 has
    // the remote master forward a `WORKER` message "when a remote worker
    // finishes", one at a time, so the primary's `remote_workers` counter
    // ticks down progressively instead of collapsing to zero all at once
    // behind whichever local worker happens to run longest.
    let mut completed = Vec::new();
    while supervisor.active_worker_count() > 0 {
        let reaped = supervisor.reap_nonblocking(ctx).await;
        for record in reaped {
            forward_worker_record(ctx, relay, record.clone()).await?;
            completed.push(record);
        }
        if supervisor.active_worker_count() > 0 {
            tokio::time::sleep(distq_master::dispatch::READINESS_POLL).await;
        }
    }

    print_summary(&completed);
    Ok(aggregate_exit_status(&completed))
}

async fn seed_pairs(
    adapter: &dyn FrameworkAdapter,
    durations: &std::collections::HashMap<SuiteKey, f64>,
) -> Result<Vec<(distq_core::SuiteId, Option<f64>)>, DriverError> {
    let mut pairs = Vec::new();
    let files = adapter
        .enumerate_suite_files()
        .await
        .map_err(|e| DriverError::Io(std::io::Error::other(e)))?;
    for path in files {
        let handles = adapter
            .enumerate_suites(&path)
            .await
            .map_err(|e| DriverError::Io(std::io::Error::other(e)))?;
        for handle in handles {
            let id = handle.id();
            let duration = durations.get(&SuiteKey::from(&id)).copied();
            pairs.push((id, duration));
        }
    }
    Ok(pairs)
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
