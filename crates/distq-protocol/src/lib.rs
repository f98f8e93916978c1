// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! distq-protocol: the wire protocol between workers, discovery, relays, and
//! the master (spec.md §6.2).
//!
//! Wire format: 4-byte big-endian length prefix + JSON payload, the same
//! framing `oj-daemon`'s IPC protocol uses, because bit-exact compatibility
//! is only required within a single run and JSON-over-length-prefix is
//! already this codebase's idiom for that.

mod types;
mod wire;

pub use types::{Request, Response};
pub use wire::{
    read_request, read_response, write_request, write_response, ProtocolError, DEFAULT_TIMEOUT,
    MAX_MESSAGE_SIZE,
};
