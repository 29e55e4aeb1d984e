//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for error classification.
//!
//! Services decide whether to retry, rebuild or stop from these predicates,
//! so each layer's errors are checked through the top-level [`IxmqError`].

use ixmq::IxmqError;
use ixmq::broadcast::BroadcastError;
use ixmq::broker::RoutingError;
use ixmq::client::ClientError;
use ixmq::message::{DecodeError, EncodeError, Reply};
use ixmq::observability::ErrorMetrics;
use ixmq::server::ServerError;
use ixmq::transport::TransportError;
use std::error::Error;
use std::time::Duration;

fn receive_failed() -> TransportError {
    TransportError::ReceiveFailed {
        source: zmq::Error::EAGAIN,
    }
}

/// Test that transport errors are found through every wrapping layer.
#[test]
fn test_transport_error_identification() {
    let wrapped: Vec<IxmqError> = vec![
        TransportError::Closed.into(),
        ClientError::Transport(receive_failed()).into(),
        ServerError::Transport(receive_failed()).into(),
        RoutingError::Transport(receive_failed()).into(),
        BroadcastError::Transport(receive_failed()).into(),
        ServerError::Bind {
            endpoint: "tcp://*:5555".to_string(),
            source: TransportError::BindFailed {
                address: "tcp://*:5555".to_string(),
                source: zmq::Error::EADDRINUSE,
            },
        }
        .into(),
    ];
    for error in &wrapped {
        assert!(error.is_transport_error(), "{error}");
    }

    let plain: IxmqError = RoutingError::UnknownRoute {
        label: "UNKNOWN".to_string(),
    }
    .into();
    assert!(!plain.is_transport_error());
    assert!(plain.transport_error().is_none());
}

/// Test transport recoverability rules.
#[test]
fn test_transport_error_recoverability() {
    assert!(receive_failed().is_recoverable());
    assert!(
        TransportError::ConnectionFailed {
            address: "tcp://indexer:5555".to_string(),
            source: zmq::Error::ECONNREFUSED,
        }
        .is_recoverable()
    );

    assert!(!TransportError::Closed.is_recoverable());
    assert!(!TransportError::invalid_configuration("bad kind").is_recoverable());
    assert!(
        !TransportError::BindFailed {
            address: "tcp://*:5555".to_string(),
            source: zmq::Error::EADDRINUSE,
        }
        .is_recoverable()
    );
}

/// Test which transport errors invalidate the socket.
#[test]
fn test_transport_should_close() {
    assert!(TransportError::Closed.should_close_transport());
    assert!(receive_failed().should_close_transport());
    assert!(
        !TransportError::PollFailed {
            source: zmq::Error::EINTR,
        }
        .should_close_transport()
    );
}

/// Test that timeouts are retryable but remote failures are answers.
#[test]
fn test_client_error_classification() {
    let timeout: IxmqError = ClientError::Timeout {
        attempts: 6,
        timeout: Duration::from_secs(30),
    }
    .into();
    assert!(timeout.is_recoverable());
    assert!(!timeout.is_fatal());

    let remote: IxmqError = ClientError::RemoteFailure {
        message: "handler not found for command: x".to_string(),
    }
    .into();
    assert!(!remote.is_recoverable());
    assert!(!remote.is_fatal());
}

/// Test that only serve-loop transport failures are fatal.
#[test]
fn test_fatal_errors() {
    let fatal: Vec<IxmqError> = vec![
        ServerError::Transport(receive_failed()).into(),
        RoutingError::Transport(receive_failed()).into(),
        BroadcastError::Transport(receive_failed()).into(),
    ];
    for error in &fatal {
        assert!(error.is_fatal(), "{error}");
        assert!(error.is_recoverable(), "{error}");
    }

    let setup: Vec<IxmqError> = vec![
        ServerError::DuplicateHandler {
            command: "echo".to_string(),
        }
        .into(),
        RoutingError::DuplicateDestination {
            destination: "inproc://a".to_string(),
        }
        .into(),
        BroadcastError::Closed.into(),
    ];
    for error in &setup {
        assert!(!error.is_fatal(), "{error}");
        assert!(!error.is_recoverable(), "{error}");
    }
}

/// Test that codec errors are neither fatal nor recoverable.
#[test]
fn test_codec_errors() {
    let decode: IxmqError = DecodeError::InconsistentStatus.into();
    let encode: IxmqError = Reply::fail("").encode().unwrap_err().into();

    for error in [&decode, &encode] {
        assert!(!error.is_fatal());
        assert!(!error.is_recoverable());
        assert!(!error.is_transport_error());
    }
    assert!(matches!(encode, IxmqError::Encode(EncodeError::InvalidReply)));
}

/// Test that the source chain reaches the innermost error.
#[test]
fn test_error_source_chain() {
    let error: IxmqError = ClientError::Connection {
        endpoint: "tcp://indexer:5555".to_string(),
        source: TransportError::invalid_configuration("bind endpoints cannot connect"),
    }
    .into();

    let client = error.source().unwrap();
    let transport = client.source().unwrap();
    assert!(transport.to_string().contains("bind endpoints cannot connect"));
}

/// Test that error metrics count by category.
#[test]
fn test_error_metrics_by_category() {
    let metrics = ErrorMetrics::new();
    metrics.record_error(&TransportError::Closed.into());
    metrics.record_error(&DecodeError::MissingPayload.into());
    metrics.record_error(
        &RoutingError::UnknownRoute {
            label: "UNKNOWN".to_string(),
        }
        .into(),
    );

    assert_eq!(metrics.total_errors(), 3);
    assert_eq!(metrics.transport_errors(), 1);
    assert_eq!(metrics.codec_errors(), 1);
    assert_eq!(metrics.component_errors(), 1);
    assert_eq!(metrics.fatal_errors(), 1);
    assert_eq!(metrics.recoverable_errors(), 1);

    metrics.reset();
    assert_eq!(metrics.total_errors(), 0);
}
