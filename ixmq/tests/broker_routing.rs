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

//! Integration tests for command routing through the broker.
//!
//! Topology per test: clients → broker frontend (ROUTER) → one DEALER per
//! registered destination → reply servers. Every endpoint is in-process and
//! named after the test so tests do not collide.

use ixmq::broker::{Broker, RoutingError};
use ixmq::client::{Client, ClientConfig, ClientError, Routing};
use ixmq::message::{Reply, Request};
use ixmq::observability::BrokerMetrics;
use ixmq::server::{HandlerTable, Server, ServerKind};
use ixmq::transport::{Context, Endpoint, ShutdownHandle};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::Span;

/// Running services that are stopped together at the end of a test.
struct Fixture {
    context: Context,
    frontend: String,
    broker_metrics: Arc<BrokerMetrics>,
    shutdowns: Vec<ShutdownHandle>,
    threads: Vec<JoinHandle<()>>,
}

impl Fixture {
    /// Starts one reply server per `(name, commands)` pair and a broker that
    /// routes each command list to its server.
    fn start(test: &str, backends: &[(&str, &[&str])]) -> Self {
        let context = Context::new();
        let frontend = format!("{test}-frontend");
        let mut broker = Broker::new(&context, Endpoint::in_process(frontend.as_str())).unwrap();
        let mut shutdowns = Vec::new();
        let mut threads = Vec::new();

        for (name, commands) in backends {
            let address = format!("{test}-{name}");
            let mut handlers = HandlerTable::new();
            for command in commands.iter() {
                handlers
                    .register(*command, |request: Request, _: &Span, name: &String| {
                        let parameters = request
                            .parameters
                            .with("served_by", name.as_str())
                            .with("command", request.command.as_str());
                        Reply::ok(parameters)
                    })
                    .unwrap();
            }
            let server = Server::bind(
                &context,
                Endpoint::in_process(address.as_str()),
                ServerKind::Reply,
                handlers,
            )
            .unwrap();
            shutdowns.push(server.shutdown_handle());
            let served_by = (*name).to_string();
            threads.push(thread::spawn(move || server.serve(&served_by).unwrap()));

            broker
                .register(Endpoint::in_process(address), *commands)
                .unwrap();
        }

        let broker_metrics = broker.metrics();
        shutdowns.push(broker.shutdown_handle());
        threads.push(thread::spawn(move || broker.serve().unwrap()));

        Self {
            context,
            frontend,
            broker_metrics,
            shutdowns,
            threads,
        }
    }

    fn client(&self, routing: Routing) -> Client {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(2))
            .with_attempts(1);
        Client::connect(
            &self.context,
            Endpoint::in_process(self.frontend.as_str()),
            config,
        )
        .unwrap()
        .with_routing(routing)
    }

    fn stop(self) {
        for shutdown in &self.shutdowns {
            shutdown.trigger();
        }
        for thread in self.threads {
            thread.join().unwrap();
        }
    }
}

/// Test that a tagged request reaches the destination registered for the tag.
#[test]
fn test_tag_routing() {
    let fixture = Fixture::start(
        "route-tag",
        &[("eth", &["ethereum"]), ("btc", &["bitcoin"])],
    );

    let mut eth = fixture.client(Routing::Tag("ethereum".to_string()));
    let reply = eth
        .request(&Request::new("ethereum").with_parameter("counter", 3))
        .unwrap();
    assert_eq!(reply.get_i64("counter"), Some(3));
    assert_eq!(reply.get_str("served_by"), Some("eth"));

    let mut btc = fixture.client(Routing::Tag("bitcoin".to_string()));
    let reply = btc.request(&Request::new("bitcoin")).unwrap();
    assert_eq!(reply.get_str("served_by"), Some("btc"));

    assert_eq!(fixture.broker_metrics.forwarded(), 2);
    assert_eq!(fixture.broker_metrics.relayed(), 2);
    fixture.stop();
}

/// Test that command routing picks the destination by command name.
#[test]
fn test_command_routing() {
    let fixture = Fixture::start(
        "route-command",
        &[("chain", &["balance", "block"]), ("index", &["search"])],
    );
    let mut client = fixture.client(Routing::Command);

    for (command, expected) in [("balance", "chain"), ("search", "index"), ("block", "chain")] {
        let reply = client.request(&Request::new(command)).unwrap();
        assert_eq!(reply.get_str("served_by"), Some(expected), "command {command}");
        assert_eq!(reply.get_str("command"), Some(command));
    }

    fixture.stop();
}

/// Test that concurrent clients each get the reply to their own request.
#[test]
fn test_envelope_preserved_under_concurrency() {
    let fixture = Fixture::start(
        "route-envelope",
        &[("a", &["work"]), ("b", &["other"])],
    );

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let mut client = fixture.client(Routing::Command);
            thread::spawn(move || {
                for sequence in 0..25 {
                    let command = if sequence % 2 == 0 { "work" } else { "other" };
                    let reply = client
                        .request(
                            &Request::new(command)
                                .with_parameter("worker", worker)
                                .with_parameter("sequence", sequence),
                        )
                        .unwrap();
                    assert_eq!(reply.get_i64("worker"), Some(worker));
                    assert_eq!(reply.get_i64("sequence"), Some(sequence));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(fixture.broker_metrics.forwarded(), 200);
    assert_eq!(fixture.broker_metrics.relayed(), 200);
    fixture.stop();
}

/// Test that an unknown label is answered with a FAIL and the broker keeps
/// serving afterwards.
#[test]
fn test_unknown_route_rejected() {
    let fixture = Fixture::start("route-unknown", &[("eth", &["ethereum"])]);

    let mut stray = fixture.client(Routing::Tag("UNKNOWN".to_string()));
    let err = stray.request(&Request::new("anything")).unwrap_err();
    match &err {
        ClientError::RemoteFailure { message } => {
            assert!(message.contains("UNKNOWN"), "message: {message}");
        }
        other => panic!("expected RemoteFailure, got {other:?}"),
    }
    assert_eq!(stray.metrics().sends(), 1);

    let mut client = fixture.client(Routing::Tag("ethereum".to_string()));
    let reply = client
        .request(&Request::new("ethereum").with_parameter("after", true))
        .unwrap();
    assert_eq!(reply.get_bool("after"), Some(true));

    assert_eq!(fixture.broker_metrics.rejected(), 1);
    fixture.stop();
}

/// Test that an unlabelled request is rejected as a malformed envelope.
#[test]
fn test_unlabelled_request_rejected() {
    let fixture = Fixture::start("route-short", &[("eth", &["echo"])]);

    let mut client = fixture.client(Routing::Direct);
    let err = client.request(&Request::new("echo")).unwrap_err();
    let message = err.remote_message().unwrap_or_default().to_string();
    assert!(message.contains("malformed envelope"), "message: {message}");

    let mut routed = fixture.client(Routing::Command);
    assert!(routed.request(&Request::new("echo")).is_ok());

    assert_eq!(fixture.broker_metrics.rejected(), 1);
    assert_eq!(fixture.broker_metrics.forwarded(), 1);
    fixture.stop();
}

/// Test that a destination cannot be registered twice and a command cannot
/// route to two destinations.
#[test]
fn test_routes_are_injective() {
    let context = Context::new();
    let mut broker = Broker::new(&context, Endpoint::in_process("route-injective")).unwrap();

    broker
        .register(Endpoint::in_process("route-injective-a"), &["balance"])
        .unwrap();

    let err = broker
        .register(Endpoint::in_process("route-injective-a"), &["block"])
        .unwrap_err();
    assert!(matches!(err, RoutingError::DuplicateDestination { .. }));

    let err = broker
        .register(Endpoint::in_process("route-injective-b"), &["block", "balance"])
        .unwrap_err();
    assert!(matches!(err, RoutingError::DuplicateCommand { .. }));

    assert_eq!(broker.routes().destinations().len(), 1);
    assert_eq!(broker.routes().destination_for("balance"), Some(0));
    assert_eq!(broker.routes().destination_for("block"), None);
}
