// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The immutable per-run context: run token, scratch paths, concurrency, and
//! whitelist, fixed at driver construction and passed by `Arc` from then on.
//!
//! This exists instead of process-wide mutable state so that every
//! collaborator (master, worker, discovery, relay) reads the same
//! configuration without reaching for ambient globals — see SPEC_FULL.md §4.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::id::RunToken;

/// Where the primary master listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A filesystem Unix-domain socket path.
    Unix(PathBuf),
    /// A TCP endpoint. An empty `host` means `0.0.0.0` (spec.md §6.1).
    Tcp { host: String, port: u16 },
}

impl Endpoint {
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Endpoint::Tcp {
            host: host.into(),
            port,
        }
    }

    /// The host to bind/connect to, defaulting the empty string to `0.0.0.0`.
    pub fn host_or_default(&self) -> &str {
        match self {
            Endpoint::Tcp { host, .. } if host.is_empty() => "0.0.0.0",
            Endpoint::Tcp { host, .. } => host,
            Endpoint::Unix(_) => "",
        }
    }
}

/// An endpoint fails to parse from its `unix:<path>` / `tcp:[host]:<port>`
/// command-line form.
#[derive(Debug, thiserror::Error)]
#[error("invalid endpoint {0:?}: expected \"unix:<path>\" or \"tcp:[host]:<port>\"")]
pub struct ParseEndpointError(String);

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Unix(path) => write!(f, "unix:{}", path.display()),
            Endpoint::Tcp { host, port } => write!(f, "tcp:{host}:{port}"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = ParseEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix("unix:") {
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }
        if let Some(rest) = s.strip_prefix("tcp:") {
            let (host, port) = rest
                .rsplit_once(':')
                .ok_or_else(|| ParseEndpointError(s.to_string()))?;
            let port: u16 = port
                .parse()
                .map_err(|_| ParseEndpointError(s.to_string()))?;
            return Ok(Endpoint::tcp(host, port));
        }
        Err(ParseEndpointError(s.to_string()))
    }
}

/// Configuration for running as a relay (remote master) rather than the
/// primary: where the primary is, and how long to retry connecting.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub primary_host: String,
    pub primary_port: u16,
    pub connect_timeout: Duration,
    pub connect_backoff: Duration,
    /// Forwarded to the primary in the `Slave` handshake for logging.
    pub slave_message: Option<String>,
}

impl RelayConfig {
    pub fn new(primary_host: impl Into<String>, primary_port: u16) -> Self {
        Self {
            primary_host: primary_host.into(),
            primary_port,
            connect_timeout: Duration::from_secs(30),
            connect_backoff: Duration::from_millis(500),
            slave_message: None,
        }
    }
}

/// Immutable state shared by every component in a single run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub token: RunToken,
    /// Scratch directory for the listener socket (if Unix) and per-worker
    /// handoff files (`<scratch>/worker_<pid>_output`, `..._suites`).
    pub scratch_dir: PathBuf,
    pub concurrency: u32,
    /// Ordered whitelist of suite names, empty if unrestricted.
    pub whitelist: Vec<String>,
    pub listen_endpoint: Endpoint,
    pub relay: Option<RelayConfig>,
    pub stats_file_path: PathBuf,
    pub early_failure_limit: Option<u32>,
    pub verbose: bool,
}

impl RunContext {
    pub fn is_relay(&self) -> bool {
        self.relay.is_some()
    }

    pub fn worker_output_path(&self, pid: u32) -> PathBuf {
        worker_output_path(&self.scratch_dir, pid)
    }

    pub fn worker_suites_path(&self, pid: u32) -> PathBuf {
        worker_suites_path(&self.scratch_dir, pid)
    }
}

/// Standalone form of `RunContext::worker_output_path`, usable by a worker
/// process that knows its own pid and scratch directory but has no reason to
/// construct a full `RunContext` (it never needs the token, concurrency, or
/// whitelist).
pub fn worker_output_path(scratch_dir: &std::path::Path, pid: u32) -> PathBuf {
    scratch_dir.join(format!("worker_{pid}_output"))
}

/// Standalone form of `RunContext::worker_suites_path`. See
/// [`worker_output_path`].
pub fn worker_suites_path(scratch_dir: &std::path::Path, pid: u32) -> PathBuf {
    scratch_dir.join(format!("worker_{pid}_suites"))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
