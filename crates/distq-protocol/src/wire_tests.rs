// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::types::{Request, Response};
use distq_core::{RunToken, SuiteId};
use std::time::Duration;

fn token() -> RunToken {
    RunToken::from_hex("cafef00d")
}

#[tokio::test]
async fn request_round_trips_over_a_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let req = Request::Pop { token: token() };
    write_request(&mut client, &req, DEFAULT_TIMEOUT)
        .await
        .expect("write");

    let read = read_request(&mut server, DEFAULT_TIMEOUT)
        .await
        .expect("read");
    assert_eq!(read, req);
}

#[tokio::test]
async fn response_round_trips_over_a_duplex_stream() {
    let (mut client, mut server) = tokio::io::duplex(4096);

    let resp = Response::Suite(SuiteId::new("a", "a_spec.rb"));
    write_response(&mut server, &resp, DEFAULT_TIMEOUT)
        .await
        .expect("write");

    let read = read_response(&mut client, DEFAULT_TIMEOUT)
        .await
        .expect("read");
    assert_eq!(read, resp);
}

#[tokio::test]
async fn read_message_reports_connection_closed_on_eof() {
    let (client, mut server) = tokio::io::duplex(4096);
    drop(client);

    let err = read_message(&mut server).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn read_message_rejects_oversized_length_prefix() {
    let (mut client, mut server) = tokio::io::duplex(4096);
    let oversized = (MAX_MESSAGE_SIZE as u32 + 1).to_be_bytes();

    tokio::spawn(async move {
        use tokio::io::AsyncWriteExt;
        let _ = client.write_all(&oversized).await;
    });

    let err = read_message(&mut server).await.unwrap_err();
    match err {
        ProtocolError::MessageTooLarge { size, max } => {
            assert_eq!(size, MAX_MESSAGE_SIZE + 1);
            assert_eq!(max, MAX_MESSAGE_SIZE);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn read_request_times_out_when_nothing_arrives() {
    let (_client, mut server) = tokio::io::duplex(4096);

    let err = read_request(&mut server, Duration::from_millis(20))
        .await
        .unwrap_err();
    assert!(matches!(err, ProtocolError::Timeout));
}

#[test]
fn encode_rejects_messages_above_the_size_cap() {
    #[derive(serde::Serialize)]
    struct Big {
        data: Vec<u8>,
    }
    let big = Big {
        data: vec![0u8; MAX_MESSAGE_SIZE + 1],
    };

    let err = encode(&big).unwrap_err();
    assert!(matches!(err, ProtocolError::MessageTooLarge { .. }));
}
