// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A listener and connection abstraction that erases Unix-vs-TCP, since the
//! dispatch loop's logic is identical for either (spec.md §6.1).

use distq_core::Endpoint;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};

/// Either side of a Unix-domain or TCP connection. Both underlying stream
/// types are `Unpin`, so dispatch is a plain match with no structural
/// pinning required.
pub enum Conn {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl AsyncRead for Conn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Unix(s) => Pin::new(s).poll_read(cx, buf),
            Conn::Tcp(s) => Pin::new(s).poll_read(cx, buf),
        }
    }
}

impl Conn {
    /// Connect to an endpoint as a client, used by workers, discovery, and
    /// relays to reach the master (spec.md §4.3, §4.4).
    pub async fn connect(endpoint: &Endpoint) -> io::Result<Conn> {
        match endpoint {
            Endpoint::Unix(path) => Ok(Conn::Unix(UnixStream::connect(path).await?)),
            Endpoint::Tcp { host, port } => {
                Ok(Conn::Tcp(TcpStream::connect((host.as_str(), *port)).await?))
            }
        }
    }
}

impl AsyncWrite for Conn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Conn::Unix(s) => Pin::new(s).poll_write(cx, buf),
            Conn::Tcp(s) => Pin::new(s).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Unix(s) => Pin::new(s).poll_flush(cx),
            Conn::Tcp(s) => Pin::new(s).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Conn::Unix(s) => Pin::new(s).poll_shutdown(cx),
            Conn::Tcp(s) => Pin::new(s).poll_shutdown(cx),
        }
    }
}

/// Either kind of listener the primary master can bind, per spec.md §6.1.
pub enum MasterListener {
    Unix(UnixListener),
    Tcp(TcpListener),
}

impl MasterListener {
    pub async fn bind(endpoint: &Endpoint) -> io::Result<Self> {
        match endpoint {
            Endpoint::Unix(path) => {
                if path.exists() {
                    std::fs::remove_file(path)?;
                }
                Ok(MasterListener::Unix(UnixListener::bind(path)?))
            }
            Endpoint::Tcp { port, .. } => {
                let bind_host = endpoint.host_or_default();
                Ok(MasterListener::Tcp(
                    TcpListener::bind((bind_host, *port)).await?,
                ))
            }
        }
    }

    /// Wait up to `timeout` for a connection to become acceptable, per the
    /// dispatch loop's 100ms readiness wait (spec.md §4.1 step 3).
    pub async fn accept_within(
        &self,
        timeout: std::time::Duration,
    ) -> io::Result<Option<Conn>> {
        let accept = async {
            match self {
                MasterListener::Unix(l) => l.accept().await.map(|(s, _)| Conn::Unix(s)),
                MasterListener::Tcp(l) => l.accept().await.map(|(s, _)| Conn::Tcp(s)),
            }
        };

        match tokio::time::timeout(timeout, accept).await {
            Ok(Ok(conn)) => Ok(Some(conn)),
            Ok(Err(e)) => Err(e),
            Err(_elapsed) => Ok(None),
        }
    }

    /// The local Unix socket path, if bound to one, so it can be removed
    /// during cleanup (spec.md §4.5 step 7).
    pub fn socket_path(&self) -> Option<std::path::PathBuf> {
        match self {
            MasterListener::Unix(l) => l
                .local_addr()
                .ok()
                .and_then(|addr| addr.as_pathname().map(std::path::Path::to_path_buf)),
            MasterListener::Tcp(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "conn_tests.rs"]
mod tests;
