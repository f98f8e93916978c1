// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use distq_core::{Endpoint, RelayConfig, RunToken};
use std::time::Duration;
use tokio::net::TcpListener;

fn ctx_with_relay(relay: RelayConfig) -> RunContext {
    RunContext {
        token: RunToken::from_hex("f00d"),
        scratch_dir: std::env::temp_dir(),
        concurrency: 2,
        whitelist: Vec::new(),
        listen_endpoint: Endpoint::tcp("127.0.0.1", 0),
        relay: Some(relay),
        stats_file_path: std::path::PathBuf::from("stats.json"),
        early_failure_limit: None,
        verbose: false,
    }
}

#[tokio::test]
async fn connect_with_backoff_succeeds_once_listener_is_up() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let mut relay = RelayConfig::new("127.0.0.1", port);
    relay.connect_timeout = Duration::from_secs(2);
    relay.connect_backoff = Duration::from_millis(10);

    let accept = tokio::spawn(async move {
        let _ = listener.accept().await;
    });

    let stream = connect_with_backoff(&relay).await.expect("connect");
    drop(stream);
    accept.await.expect("accept task");
}

#[tokio::test]
async fn connect_with_backoff_times_out_when_nothing_listens() {
    let mut relay = RelayConfig::new("127.0.0.1", 1);
    relay.connect_timeout = Duration::from_millis(150);
    relay.connect_backoff = Duration::from_millis(20);

    let err = connect_with_backoff(&relay).await.unwrap_err();
    assert!(matches!(err, RelayError::ConnectTimeout(_)));
}

#[tokio::test]
async fn handshake_succeeds_on_ok_response() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let relay = RelayConfig::new("127.0.0.1", port);
    let ctx = ctx_with_relay(relay.clone());

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let _req = read_response_as_request(&mut stream).await;
        write_response(&mut stream, &Response::Ok).await;
    });

    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.expect("connect");
    handshake(&mut stream, &ctx, &relay, "host-a").await.expect("handshake");
    server.await.expect("server task");
}

#[tokio::test]
async fn handshake_fails_on_wrong_run_response() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let relay = RelayConfig::new("127.0.0.1", port);
    let ctx = ctx_with_relay(relay.clone());

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let _req = read_response_as_request(&mut stream).await;
        write_response(&mut stream, &Response::WrongRun).await;
    });

    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.expect("connect");
    let err = handshake(&mut stream, &ctx, &relay, "host-a").await.unwrap_err();
    assert!(matches!(err, RelayError::HandshakeRejected(Response::WrongRun)));
    server.await.expect("server task");
}

async fn read_response_as_request(stream: &mut TcpStream) -> Request {
    distq_protocol::read_request(stream, distq_protocol::DEFAULT_TIMEOUT)
        .await
        .expect("read request")
}

async fn write_response(stream: &mut TcpStream, response: &Response) {
    distq_protocol::write_response(stream, response, distq_protocol::DEFAULT_TIMEOUT)
        .await
        .expect("write response")
}
