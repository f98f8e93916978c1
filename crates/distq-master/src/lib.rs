// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

//! The master's dispatch loop, worker supervisor, and relay client
//! (spec.md §4.1, §4.2, §4.4).

mod conn;
pub mod dispatch;
mod error;
pub mod relay;
pub mod state;
pub mod supervisor;

pub use conn::{Conn, MasterListener};
pub use dispatch::{run_dispatch_loop, DispatchOutcome, Heartbeat};
pub use error::MasterError;
pub use state::MasterState;
pub use supervisor::{SpawnSpec, WorkerSupervisor};
