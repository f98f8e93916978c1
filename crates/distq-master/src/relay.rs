// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Relay (remote master) client logic (spec.md §4.4).
//!
//! Grounded on `cli/src/client.rs`'s `connect_with_retry` shape: retry
//! connecting within a timeout, backing off between attempts, and treating
//! anything other than success as fatal once the window elapses.

use std::time::Instant;

use distq_core::{RelayConfig, RunContext, WorkerRecord};
use distq_protocol::{read_response, write_request, ProtocolError, Request, Response};
use thiserror::Error;
use tokio::net::TcpStream;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("could not connect to primary within {0:?}")]
    ConnectTimeout(std::time::Duration),
    #[error("protocol error talking to primary: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("primary rejected handshake: {0:?}")]
    HandshakeRejected(Response),
}

/// Retry connecting to the primary within `relay.connect_timeout`, backing
/// off by `relay.connect_backoff` between attempts (spec.md §4.4: "retries
/// connecting to the primary for up to a configured timeout").
pub async fn connect_with_backoff(relay: &RelayConfig) -> Result<TcpStream, RelayError> {
    let deadline = Instant::now() + relay.connect_timeout;

    loop {
        match TcpStream::connect((relay.primary_host.as_str(), relay.primary_port)).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                if Instant::now() >= deadline {
                    return Err(RelayError::ConnectTimeout(relay.connect_timeout));
                }
                warn!(error = %e, "relay connect attempt failed, retrying");
                tokio::time::sleep(relay.connect_backoff).await;
            }
        }
    }
}

/// Send the `SLAVE` handshake and expect `OK` back. Anything else (per
/// spec.md §4.4, including `WRONG RUN`) is a fatal abort.
pub async fn handshake(
    stream: &mut TcpStream,
    ctx: &RunContext,
    relay: &RelayConfig,
    hostname: &str,
) -> Result<(), RelayError> {
    let request = Request::Slave {
        token: ctx.token.clone(),
        concurrency: ctx.concurrency,
        hostname: hostname.to_string(),
        message: relay.slave_message.clone(),
    };
    write_request(stream, &request, distq_protocol::DEFAULT_TIMEOUT).await?;

    match read_response(stream, distq_protocol::DEFAULT_TIMEOUT).await? {
        Response::Ok => {
            info!(hostname, "relay handshake accepted by primary");
            Ok(())
        }
        other => Err(RelayError::HandshakeRejected(other)),
    }
}

/// Forward a finalized remote worker record to the primary over a fresh
/// connection (spec.md §4.4: "opens a new connection to the primary to
/// send... the serialized worker record").
pub async fn forward_worker_record(
    ctx: &RunContext,
    relay: &RelayConfig,
    record: WorkerRecord,
) -> Result<(), RelayError> {
    let mut stream = TcpStream::connect((relay.primary_host.as_str(), relay.primary_port)).await?;
    let request = Request::Worker {
        token: ctx.token.clone(),
        record,
    };
    write_request(&mut stream, &request, distq_protocol::DEFAULT_TIMEOUT).await?;
    Ok(())
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
