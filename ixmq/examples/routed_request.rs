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

//! # Routed Request Example
//!
//! Two backend services behind one broker. Clients address the broker only
//! and pick a backend by routing label.
//!
//! ```text
//! client (Routing::Command) ─┐                 ┌─ DEALER → chain server  (balance, block)
//!                            ├─ ROUTER broker ─┤
//! client (Routing::Tag)     ─┘                 └─ DEALER → search server (search)
//! ```
//!
//! ## Running This Example
//!
//! ```bash
//! RUST_LOG=ixmq=debug cargo run --example routed_request
//! ```

use ixmq::broker::Broker;
use ixmq::client::{Client, ClientConfig, Routing};
use ixmq::message::{Parameters, Reply, Request};
use ixmq::server::{HandlerTable, Server, ServerKind};
use ixmq::transport::{Context, Endpoint, ShutdownHandle};
use std::error::Error;
use std::thread::{self, JoinHandle};
use tracing::{Span, info, warn};
use tracing_subscriber::EnvFilter;

type Service = (ShutdownHandle, JoinHandle<()>);

fn spawn_service(
    context: &Context,
    name: &'static str,
    commands: &[&str],
) -> Result<Service, Box<dyn Error>> {
    let mut handlers = HandlerTable::new();
    for command in commands {
        handlers.register(*command, |request: Request, _: &Span, service: &&'static str| {
            let parameters = Parameters::new()
                .with("service", *service)
                .with("command", request.command.as_str());
            Reply::ok(parameters)
        })?;
    }
    let server = Server::bind(
        context,
        Endpoint::in_process(name),
        ServerKind::Reply,
        handlers,
    )?;
    let shutdown = server.shutdown_handle();
    let handle = thread::spawn(move || {
        if let Err(e) = server.serve(&name) {
            warn!(error = %e, "service stopped");
        }
    });
    Ok((shutdown, handle))
}

fn connect(context: &Context, routing: Routing) -> Result<Client, Box<dyn Error>> {
    let client = Client::connect(context, Endpoint::in_process("broker"), ClientConfig::new())?;
    Ok(client.with_routing(routing))
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let context = Context::new();
    let services = [
        spawn_service(&context, "chain", &["balance", "block", "chain"])?,
        spawn_service(&context, "search", &["search"])?,
    ];

    let mut broker = Broker::new(&context, Endpoint::in_process("broker"))?;
    broker.register(Endpoint::in_process("chain"), &["balance", "block", "chain"])?;
    broker.register(Endpoint::in_process("search"), &["search"])?;
    let broker_shutdown = broker.shutdown_handle();
    let broker_thread = thread::spawn(move || broker.serve());

    let mut by_command = connect(&context, Routing::Command)?;
    for command in ["balance", "search", "block"] {
        let reply = by_command.request(&Request::new(command))?;
        info!(command, service = ?reply.get_str("service"), "routed by command");
    }

    let mut by_tag = connect(&context, Routing::Tag("chain".to_string()))?;
    let reply = by_tag.request(&Request::new("chain"))?;
    info!(service = ?reply.get_str("service"), "routed by tag");

    let mut stray = connect(&context, Routing::Tag("UNKNOWN".to_string()))?;
    if let Err(e) = stray.request(&Request::new("anything")) {
        info!(error = %e, "unknown label rejected by the broker");
    }

    broker_shutdown.trigger();
    broker_thread.join().map_err(|_| "broker thread panicked")??;
    for (shutdown, handle) in services {
        shutdown.trigger();
        handle.join().map_err(|_| "service thread panicked")?;
    }
    Ok(())
}
