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

//! Integration tests for request-reply and fire-and-forget dispatch.
//!
//! Each test owns its own `Context` and in-process endpoints, so tests can run
//! in parallel. The retry tests talk to a raw ROUTER socket over loopback TCP
//! to observe every resend.

use ixmq::client::{Client, ClientConfig, ClientError, Pusher};
use ixmq::message::{Parameters, Reply, Request};
use ixmq::server::{HandlerTable, Server, ServerKind};
use ixmq::transport::{Context, Endpoint, ShutdownHandle};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::Span;

fn handlers() -> HandlerTable<()> {
    HandlerTable::new()
        .with("echo", |request: Request, _: &Span, _: &()| {
            Reply::ok(request.parameters)
        })
        .unwrap()
        .with("reject", |request: Request, _: &Span, _: &()| {
            let reason = request.parameters.get_str("reason").unwrap_or("rejected");
            Reply::fail(reason)
        })
        .unwrap()
}

fn spawn_server(context: &Context, name: &str) -> (ShutdownHandle, JoinHandle<()>) {
    let server = Server::bind(
        context,
        Endpoint::in_process(name),
        ServerKind::Reply,
        handlers(),
    )
    .unwrap();
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || server.serve(&()).unwrap());
    (shutdown, handle)
}

fn quick_config() -> ClientConfig {
    ClientConfig::new()
        .with_timeout(Duration::from_secs(2))
        .with_attempts(1)
}

/// Binds a ROUTER that never answers and returns its address along with a
/// thread that reports how many requests arrived before it went quiet.
fn silent_router(context: &zmq::Context) -> (String, JoinHandle<usize>) {
    let router = context.socket(zmq::ROUTER).unwrap();
    router.set_linger(0).unwrap();
    router.set_rcvtimeo(1000).unwrap();
    router.bind("tcp://127.0.0.1:*").unwrap();
    let address = router.get_last_endpoint().unwrap().unwrap();

    let handle = thread::spawn(move || {
        let mut received = 0;
        while router.recv_multipart(0).is_ok() {
            received += 1;
        }
        received
    });
    (address, handle)
}

/// Test that an echo request returns its parameters unchanged.
#[test]
fn test_echo_round_trip() {
    let context = Context::new();
    let (shutdown, server) = spawn_server(&context, "rr-echo");

    let mut client =
        Client::connect(&context, Endpoint::in_process("rr-echo"), quick_config()).unwrap();
    let reply = client
        .request(&Request::new("echo").with_parameter("counter", 3))
        .unwrap();

    assert_eq!(reply.get_i64("counter"), Some(3));
    assert_eq!(reply.len(), 1);
    assert_eq!(client.metrics().sends(), 1);
    assert_eq!(client.metrics().reconnects(), 1);

    shutdown.trigger();
    server.join().unwrap();
}

/// Test that a client issues many requests over one connection.
#[test]
fn test_sequential_requests() {
    let context = Context::new();
    let (shutdown, server) = spawn_server(&context, "rr-sequential");

    let mut client =
        Client::connect(&context, Endpoint::in_process("rr-sequential"), quick_config()).unwrap();
    for i in 0..50 {
        let reply = client
            .request(&Request::new("echo").with_parameter("i", i))
            .unwrap();
        assert_eq!(reply.get_i64("i"), Some(i));
    }

    assert_eq!(client.metrics().requests(), 50);
    assert_eq!(client.metrics().retries(), 0);
    assert_eq!(client.metrics().reconnects(), 50);

    shutdown.trigger();
    server.join().unwrap();
}

/// Test that an unregistered command yields a FAIL naming the command.
#[test]
fn test_unknown_command_fails_with_name() {
    let context = Context::new();
    let (shutdown, server) = spawn_server(&context, "rr-unknown");

    let mut client =
        Client::connect(&context, Endpoint::in_process("rr-unknown"), quick_config()).unwrap();
    let err = client.request(&Request::new("frobnicate")).unwrap_err();

    match err {
        ClientError::RemoteFailure { message } => {
            assert!(message.contains("frobnicate"), "message: {message}");
        }
        other => panic!("expected RemoteFailure, got {other:?}"),
    }

    shutdown.trigger();
    server.join().unwrap();
}

/// Test that a FAIL reply is returned immediately and never retried.
#[test]
fn test_remote_failure_is_not_retried() {
    let context = Context::new();
    let server = Server::bind(
        &context,
        Endpoint::in_process("rr-no-retry"),
        ServerKind::Reply,
        handlers(),
    )
    .unwrap();
    let shutdown = server.shutdown_handle();
    let server_metrics = server.metrics();
    let handle = thread::spawn(move || server.serve(&()).unwrap());

    let config = ClientConfig::new()
        .with_timeout(Duration::from_secs(2))
        .with_attempts(5);
    let mut client =
        Client::connect(&context, Endpoint::in_process("rr-no-retry"), config).unwrap();
    let err = client
        .request(&Request::new("reject").with_parameter("reason", "quota exceeded"))
        .unwrap_err();

    assert_eq!(err.remote_message(), Some("quota exceeded"));
    assert_eq!(client.metrics().sends(), 1);
    assert_eq!(client.metrics().remote_failures(), 1);

    shutdown.trigger();
    handle.join().unwrap();
    assert_eq!(server_metrics.received(), 1);
}

/// Test that `request_reply` reports a FAIL reply as a remote failure
/// and returns the full reply on OK.
#[test]
fn test_request_reply_fail_is_remote_failure() {
    let context = Context::new();
    let (shutdown, server) = spawn_server(&context, "rr-raw-reply");

    let mut client =
        Client::connect(&context, Endpoint::in_process("rr-raw-reply"), quick_config()).unwrap();
    let err = client
        .request_reply(&Request::new("reject").with_parameter("reason", "no"))
        .unwrap_err();
    match err {
        ClientError::RemoteFailure { message } => assert_eq!(message, "no"),
        other => panic!("expected RemoteFailure, got {other:?}"),
    }

    let reply = client
        .request_reply(&Request::new("echo").with_parameter("n", 1))
        .unwrap();
    assert!(reply.is_ok());
    assert_eq!(reply.parameters.get_i64("n"), Some(1));
    assert_eq!(client.metrics().sends(), 2);

    shutdown.trigger();
    server.join().unwrap();
}

/// Test that an unanswered request is sent `attempts + 1` times and then
/// reported as a timeout.
#[test]
fn test_retry_bound_on_silence() {
    let zmq_context = zmq::Context::new();
    let (address, router) = silent_router(&zmq_context);

    let config = ClientConfig::new()
        .with_timeout(Duration::from_millis(100))
        .with_attempts(2);
    let mut client =
        Client::connect(&Context::new(), Endpoint::connect_remote(address), config).unwrap();

    let started = Instant::now();
    let err = client.request(&Request::new("echo")).unwrap_err();
    let elapsed = started.elapsed();

    match err {
        ClientError::Timeout { attempts, timeout } => {
            assert_eq!(attempts, 3);
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(elapsed >= Duration::from_millis(300), "elapsed {elapsed:?}");
    assert_eq!(client.metrics().sends(), 3);
    // One fresh socket per request plus one per timeout.
    assert_eq!(client.metrics().reconnects(), 4);

    assert_eq!(router.join().unwrap(), 3);
}

/// Test that a client recovers once a server appears after a lost request.
#[test]
fn test_late_server_answers_resend() {
    let context = Context::new();
    let config = ClientConfig::new()
        .with_timeout(Duration::from_millis(200))
        .with_attempts(10);
    let mut client = Client::connect(&context, Endpoint::in_process("rr-late"), config).unwrap();

    let (ready_tx, ready_rx) = mpsc::channel();
    let server_context = context.clone();
    let server = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        let server = Server::bind(
            &server_context,
            Endpoint::in_process("rr-late"),
            ServerKind::Reply,
            handlers(),
        )
        .unwrap();
        ready_tx.send(server.shutdown_handle()).unwrap();
        server.serve(&()).unwrap();
    });

    let reply = client
        .request(&Request::new("echo").with_parameter("late", true))
        .unwrap();
    assert_eq!(reply.get_bool("late"), Some(true));
    assert!(client.metrics().retries() >= 1);

    ready_rx.recv().unwrap().trigger();
    server.join().unwrap();
}

/// Test that a pull server handles pushed requests without replying and
/// survives unknown commands.
#[test]
fn test_pull_server_consumes_pushes() {
    let context = Context::new();
    let handlers = HandlerTable::new()
        .with(
            "record",
            |request: Request, _: &Span, sink: &mpsc::Sender<i64>| {
                if let Some(n) = request.parameters.get_i64("n") {
                    sink.send(n).ok();
                }
                Reply::ok(Parameters::new())
            },
        )
        .unwrap();
    let server = Server::bind(
        &context,
        Endpoint::in_process("rr-pull"),
        ServerKind::Pull,
        handlers,
    )
    .unwrap();
    let shutdown = server.shutdown_handle();
    let metrics = server.metrics();

    let (sink, recorded) = mpsc::channel();
    let handle = thread::spawn(move || server.serve(&sink).unwrap());

    let pusher = Pusher::connect(&context, Endpoint::in_process("rr-pull")).unwrap();
    pusher.push(&Request::new("unknown")).unwrap();
    for n in 1..=3 {
        pusher
            .push(&Request::new("record").with_parameter("n", n))
            .unwrap();
    }

    let timeout = Duration::from_secs(2);
    let got: Vec<i64> = (0..3)
        .map(|_| recorded.recv_timeout(timeout).unwrap())
        .collect();
    assert_eq!(got, vec![1, 2, 3]);
    assert_eq!(metrics.unhandled(), 1);
    assert_eq!(metrics.replied(), 0);

    shutdown.trigger();
    handle.join().unwrap();
}

/// Test that a server stops promptly after shutdown is triggered.
#[test]
fn test_shutdown_stops_serving() {
    let context = Context::new();
    let (shutdown, server) = spawn_server(&context, "rr-shutdown");

    thread::sleep(Duration::from_millis(50));
    let started = Instant::now();
    shutdown.trigger();
    server.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
}
