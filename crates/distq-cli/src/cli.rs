// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `distq` command line: one command, "run the suite" (spec.md §6.3's
//! configuration surface). No subcommand tree is needed — this tool only
//! ever does one thing.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distq", about = "Distributed test executor")]
pub struct Args {
    /// Number of local workers to fork. Defaults to the host's CPU count,
    /// falling back to 2 if it cannot be determined (spec.md §6.3).
    #[arg(long, env = "DISTQ_CONCURRENCY")]
    pub concurrency: Option<u32>,

    /// Where this master listens: `unix:<path>` or `tcp:[host]:<port>`.
    /// Defaults to a Unix socket under the scratch directory.
    #[arg(long, env = "DISTQ_LISTEN")]
    pub listen_endpoint: Option<String>,

    /// Primary's `host:port` to relay into. If set, this process runs as a
    /// remote master instead of a primary.
    #[arg(long, env = "DISTQ_RELAY")]
    pub relay_endpoint: Option<String>,

    /// Seconds to retry connecting to the primary before giving up.
    #[arg(long, env = "DISTQ_RELAY_CONNECT_TIMEOUT_SECONDS", default_value_t = 30)]
    pub relay_connect_timeout_seconds: u64,

    /// Comma-separated suite names. If set, only these suites run, in this
    /// order.
    #[arg(long, env = "DISTQ_WHITELIST", value_delimiter = ',')]
    pub whitelist: Vec<String>,

    /// Where duration history is loaded from and saved to.
    #[arg(long, env = "DISTQ_STATS_FILE", default_value = ".test_queue_stats")]
    pub stats_file_path: PathBuf,

    /// Force a known run token (hex), for coordinated multi-host runs.
    /// Generated randomly if unset.
    #[arg(long, env = "DISTQ_RELAY_TOKEN")]
    pub relay_token: Option<String>,

    /// Forwarded to the primary's `SLAVE` handshake for logging. Newlines
    /// are stripped.
    #[arg(long, env = "DISTQ_SLAVE_MESSAGE")]
    pub slave_message: Option<String>,

    /// Consecutive suite failures a worker tolerates before escalating with
    /// `KABOOM`.
    #[arg(long, env = "DISTQ_EARLY_FAILURE_LIMIT")]
    pub early_failure_limit: Option<u32>,

    #[arg(short, long, env = "DISTQ_VERBOSE")]
    pub verbose: bool,

    /// Scratch directory for the listener socket and per-worker handoff
    /// files.
    #[arg(long, env = "DISTQ_SCRATCH_DIR", default_value = ".")]
    pub scratch_dir: PathBuf,

    /// Glob pattern candidate suite files are drawn from.
    #[arg(long, env = "DISTQ_GLOB_PATTERN", default_value = "**/*")]
    pub glob_pattern: String,

    /// Path to the framework-specific runner binary.
    #[arg(long)]
    pub runner: PathBuf,

    /// Path to the `distq-worker` binary, if not on `PATH`.
    #[arg(long, default_value = "distq-worker")]
    pub worker_bin: PathBuf,

    /// Path to the `distq-discover` binary, if not on `PATH`.
    #[arg(long, default_value = "distq-discover")]
    pub discover_bin: PathBuf,

    /// This host's name, reported in worker records and the `SLAVE`
    /// handshake.
    #[arg(long)]
    pub hostname: Option<String>,
}
