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

#![doc = include_str!("../../README.md")]
#![allow(clippy::module_inception)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! ## Architecture
//!
//! ixmq is organized into layers, leaves first:
//!
//! - **[`transport`]**: endpoints, the shared [`Context`], socket setup and
//!   multipart frame helpers over libzmq
//! - **[`message`]**: [`Request`], [`Reply`] and [`Broadcast`] and their JSON
//!   text encoding
//! - **[`client`]**: the reliable request-reply [`Client`], the
//!   fire-and-forget [`Pusher`] and the broadcast [`Subscriber`]
//! - **[`server`]**: the command dispatch [`Server`] and its [`HandlerTable`]
//! - **[`broker`]**: the command routing [`Broker`]
//! - **[`broadcast`]**: the single-owner [`Broadcaster`]
//! - **[`supervisor`]**: restart policies for serve loops
//! - **[`observability`]**: counters and structured error logging
//!
//! ## Threading
//!
//! Every client, server, broker and broadcaster owns its sockets and is used
//! from one thread at a time. Serve loops block; run them on dedicated
//! threads or `tokio::task::spawn_blocking`. Sharing happens through cheap
//! handles: [`Context`], [`Publisher`] and
//! [`ShutdownHandle`](transport::ShutdownHandle).
//!
//! ## Echo round trip
//!
//! ```rust,no_run
//! use ixmq::client::{Client, ClientConfig};
//! use ixmq::message::{Reply, Request};
//! use ixmq::server::{HandlerTable, Server, ServerKind};
//! use ixmq::transport::{Context, Endpoint};
//! use tracing::Span;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = Context::new();
//!
//! let handlers = HandlerTable::new()
//!     .with("echo", |request: Request, _: &Span, _: &()| Reply::ok(request.parameters))?;
//! let server = Server::bind(&context, Endpoint::in_process("echo"), ServerKind::Reply, handlers)?;
//! let shutdown = server.shutdown_handle();
//! let worker = std::thread::spawn(move || server.serve(&()));
//!
//! let mut client = Client::connect(&context, Endpoint::in_process("echo"), ClientConfig::default())?;
//! let params = client.request(&Request::new("echo").with_parameter("counter", 3))?;
//! assert_eq!(params.get_i64("counter"), Some(3));
//!
//! shutdown.trigger();
//! worker.join().unwrap()?;
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod broker;
pub mod client;
pub mod error;
pub mod message;
pub mod observability;
pub mod server;
pub mod supervisor;
pub mod transport;

pub use broadcast::{BroadcastError, Broadcaster, Publisher};
pub use broker::{Broker, RoutingError, RoutingTable};
pub use client::{Client, ClientConfig, ClientError, Pusher, Routing, Subscriber};
pub use error::IxmqError;
pub use message::{Broadcast, DecodeError, EncodeError, Parameters, Reply, Request, Status, Value};
pub use observability::{ErrorMetrics, log_error};
pub use server::{CommandHandler, HandlerTable, Server, ServerError, ServerKind};
pub use supervisor::{RestartStrategy, Supervisor, SupervisorError};
pub use transport::{Context, Endpoint, EndpointKind, TransportError};
