// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments the run driver forks the discovery subprocess with
//! (spec.md §4.3).

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distq-discover", about = "Incremental suite discovery")]
pub struct Args {
    /// This run's token.
    #[arg(long)]
    pub token: String,

    /// Where the primary master listens, in `unix:<path>` or
    /// `tcp:<host>:<port>` form.
    #[arg(long)]
    pub endpoint: String,

    /// Path to the framework-specific runner binary.
    #[arg(long)]
    pub runner: PathBuf,

    /// Glob pattern candidate suite files are drawn from.
    #[arg(long, default_value = "**/*")]
    pub glob_pattern: String,
}

impl Args {
    pub fn endpoint(&self) -> Result<distq_core::Endpoint, distq_core::context::ParseEndpointError> {
        self.endpoint.parse()
    }
}
