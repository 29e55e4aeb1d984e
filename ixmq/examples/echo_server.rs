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

//! # Echo Server Example
//!
//! A reply server with two commands and a client that calls them over
//! loopback TCP.
//!
//! ## What This Example Shows
//!
//! - Building a [`HandlerTable`] from closures
//! - Binding a reply server and serving it on its own thread
//! - Sending requests with bounded retry
//! - How a FAIL reply surfaces as [`ClientError::RemoteFailure`]
//! - Stopping the server through its shutdown handle
//!
//! ## Running This Example
//!
//! ```bash
//! RUST_LOG=ixmq=debug cargo run --example echo_server
//! ```

use ixmq::client::{Client, ClientConfig, ClientError};
use ixmq::message::{Parameters, Reply, Request};
use ixmq::server::{HandlerTable, Server, ServerKind};
use ixmq::transport::{Context, Endpoint};
use std::error::Error;
use std::thread;
use std::time::Duration;
use tracing::{Span, info};
use tracing_subscriber::EnvFilter;

/// Shared state handed to every handler.
struct Greeter {
    greeting: String,
}

fn handlers() -> Result<HandlerTable<Greeter>, Box<dyn Error>> {
    let table = HandlerTable::new()
        .with("echo", |request: Request, _: &Span, _: &Greeter| {
            Reply::ok(request.parameters)
        })?
        .with("greet", |request: Request, _: &Span, state: &Greeter| {
            let Some(name) = request.parameters.get_str("name") else {
                return Reply::fail("missing parameter: name");
            };
            Reply::ok(Parameters::new().with("message", format!("{}, {name}", state.greeting)))
        })?;
    Ok(table)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let context = Context::new();
    let server = Server::bind(
        &context,
        Endpoint::bind_local("tcp://127.0.0.1:5555"),
        ServerKind::Reply,
        handlers()?,
    )?;
    let shutdown = server.shutdown_handle();
    let state = Greeter {
        greeting: "hello".to_string(),
    };
    let serving = thread::spawn(move || server.serve(&state));

    let config = ClientConfig::new()
        .with_timeout(Duration::from_secs(2))
        .with_attempts(3);
    let mut client = Client::connect(
        &context,
        Endpoint::connect_remote("tcp://127.0.0.1:5555"),
        config,
    )?;

    let reply = client.request(&Request::new("echo").with_parameter("counter", 3))?;
    info!(counter = ?reply.get_i64("counter"), "echo answered");

    let reply = client.request(&Request::new("greet").with_parameter("name", "indexer"))?;
    info!(message = ?reply.get_str("message"), "greet answered");

    match client.request(&Request::new("greet")) {
        Err(ClientError::RemoteFailure { message }) => info!(%message, "greet refused"),
        other => info!(?other, "unexpected outcome"),
    }

    shutdown.trigger();
    serving.join().map_err(|_| "server thread panicked")??;
    Ok(())
}
