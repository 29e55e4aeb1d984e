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

//! Reliable request-reply client.

use crate::client::{ClientConfig, ClientError};
use crate::message::{Parameters, Reply, Request, Status};
use crate::observability::ClientMetrics;
use crate::transport::context::{Attach, DISCARD_LINGER, open};
use crate::transport::frames::{poll_readable, recv_frames, send_frames};
use crate::transport::{Context, Endpoint, EndpointKind, Pattern, TransportError};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How a request is framed on the wire.
///
/// A [`Broker`](crate::broker::Broker) picks the backend from a label frame
/// sent ahead of the request blob. Servers reached directly need no label,
/// and servers reached through a broker skip it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Routing {
    /// Send the request blob alone.
    #[default]
    Direct,
    /// Prefix the request's command name as the routing label.
    Command,
    /// Prefix a fixed service tag as the routing label.
    Tag(String),
}

impl Routing {
    fn label<'a>(&'a self, request: &'a Request) -> Option<&'a str> {
        match self {
            Self::Direct => None,
            Self::Command => Some(&request.command),
            Self::Tag(tag) => Some(tag),
        }
    }
}

/// A request-reply client implementing the Lazy Pirate pattern.
///
/// Every call to [`request`](Self::request) starts from a fresh socket,
/// sends the request, and waits up to the configured timeout for a reply. On
/// timeout the socket is discarded, so a late reply can never be paired with
/// the next request, and the request is resent until the attempts run out.
///
/// A FAIL reply is an answer, not a fault: it is returned as
/// [`ClientError::RemoteFailure`] immediately and never retried.
///
/// The request methods take `&mut self`, so one client serves one caller at
/// a time. Use one client per concurrent caller.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::client::{Client, ClientConfig};
/// use ixmq::message::Request;
/// use ixmq::transport::{Context, Endpoint};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let mut client = Client::connect(
///     &context,
///     Endpoint::connect_remote("tcp://localhost:5555"),
///     ClientConfig::default(),
/// )?;
///
/// let params = client.request(&Request::new("echo").with_parameter("counter", 3))?;
/// assert_eq!(params.get_i64("counter"), Some(3));
/// # Ok(())
/// # }
/// ```
pub struct Client {
    context: Context,
    endpoint: Endpoint,
    config: ClientConfig,
    routing: Routing,
    socket: zmq::Socket,
    metrics: Arc<ClientMetrics>,
}

impl Client {
    /// Connects a client to a remote or in-process server.
    ///
    /// The socket is created here so a bad endpoint or credentials fail at
    /// construction rather than on the first request.
    pub fn connect(
        context: &Context,
        endpoint: Endpoint,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let socket = open_req(context, &endpoint).map_err(|source| ClientError::Connection {
            endpoint: endpoint.address().to_string(),
            source,
        })?;

        debug!(
            endpoint = %endpoint,
            timeout = ?config.timeout,
            attempts = config.attempts,
            "client connected"
        );

        Ok(Self {
            context: context.clone(),
            endpoint,
            config,
            routing: Routing::Direct,
            socket,
            metrics: Arc::new(ClientMetrics::new()),
        })
    }

    /// Sets how requests are framed.
    pub fn with_routing(mut self, routing: Routing) -> Self {
        self.routing = routing;
        self
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The retry policy in use.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared handle to this client's counters.
    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Sends `request` and returns the parameters of the OK reply.
    pub fn request(&mut self, request: &Request) -> Result<Parameters, ClientError> {
        self.request_reply(request).map(|reply| reply.parameters)
    }

    /// Sends `request` and returns the full OK reply.
    ///
    /// Retry rules are the same as [`request`](Self::request), and a FAIL
    /// reply is likewise returned as [`ClientError::RemoteFailure`].
    pub fn request_reply(&mut self, request: &Request) -> Result<Reply, ClientError> {
        let mut frames = Vec::with_capacity(2);
        if let Some(label) = self.routing.label(request) {
            frames.push(label.as_bytes().to_vec());
        }
        frames.push(request.encode()?.into_bytes());

        self.metrics.record_request();
        self.reconnect()?;

        let mut retries_left = self.config.attempts;
        let mut sends = 0u32;
        loop {
            send_frames(&self.socket, &frames)?;
            sends += 1;
            self.metrics.record_send();
            trace!(command = %request.command, attempt = sends, "request sent");

            if poll_readable(&self.socket, self.config.timeout)? {
                let received = recv_frames(&self.socket)?;
                let reply = Reply::from_frames(&received)?;
                if reply.status == Status::Fail {
                    self.metrics.record_remote_failure();
                    debug!(command = %request.command, message = %reply.message, "remote failure");
                    return Err(ClientError::RemoteFailure {
                        message: reply.message,
                    });
                }
                return Ok(reply);
            }

            self.metrics.record_timeout();
            warn!(
                endpoint = %self.endpoint,
                command = %request.command,
                attempt = sends,
                retries_left,
                "no reply within timeout, reconnecting"
            );
            self.reconnect()?;

            if retries_left == 0 {
                return Err(ClientError::Timeout {
                    attempts: sends,
                    timeout: self.config.timeout,
                });
            }
            retries_left -= 1;
        }
    }

    /// Replaces the socket with a fresh one using the same endpoint.
    fn reconnect(&mut self) -> Result<(), TransportError> {
        self.socket = open_req(&self.context, &self.endpoint)?;
        self.metrics.record_reconnect();
        Ok(())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .field("routing", &self.routing)
            .finish_non_exhaustive()
    }
}

fn open_req(context: &Context, endpoint: &Endpoint) -> Result<zmq::Socket, TransportError> {
    endpoint.expect_kind(
        "client",
        &[EndpointKind::ConnectRemote, EndpointKind::InProcess],
    )?;
    open(context, endpoint, Pattern::Req, Attach::Connect, DISCARD_LINGER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::context::SERVICE_LINGER;
    use crate::transport::frames::recv_with_metadata;
    use std::thread;
    use std::time::{Duration, Instant};

    fn fast_config(attempts: u32) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(Duration::from_millis(100))
            .with_attempts(attempts)
    }

    #[test]
    fn test_bind_endpoint_rejected() {
        let context = Context::new();
        let err = Client::connect(&context, Endpoint::bind_local("tcp://*:0"), fast_config(0))
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Connection {
                source: TransportError::InvalidConfiguration { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let context = Context::new();
        let config = ClientConfig::new().with_timeout(Duration::ZERO);
        let err = Client::connect(&context, Endpoint::in_process("client-zero"), config)
            .unwrap_err();
        assert!(matches!(err, ClientError::Configuration { .. }));
    }

    #[test]
    fn test_routing_labels() {
        let request = Request::new("categorize");
        assert_eq!(Routing::Direct.label(&request), None);
        assert_eq!(Routing::Command.label(&request), Some("categorize"));
        assert_eq!(
            Routing::Tag("ethereum".to_string()).label(&request),
            Some("ethereum")
        );
    }

    #[test]
    fn test_labelled_request_frames() {
        let context = Context::new();
        let endpoint = Endpoint::in_process("client-labelled");
        let rep = open(&context, &endpoint, Pattern::Rep, Attach::Bind, SERVICE_LINGER).unwrap();

        let server = thread::spawn(move || {
            let received = recv_with_metadata(&rep).unwrap();
            let reply = Reply::ok(Parameters::new()).encode().unwrap();
            send_frames(&rep, &[reply.as_bytes()]).unwrap();
            received.frames
        });

        let mut client = Client::connect(&context, endpoint, fast_config(0))
            .unwrap()
            .with_routing(Routing::Tag("svc".to_string()));
        client.request(&Request::new("ping")).unwrap();

        let frames = server.join().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], b"svc");
        assert!(frames[1].starts_with(b"{"));
    }

    #[test]
    fn test_timeout_counts_every_send() {
        let context = Context::new();
        let endpoint = Endpoint::in_process("client-silent");
        let _silent = open(&context, &endpoint, Pattern::Router, Attach::Bind, SERVICE_LINGER).unwrap();

        let mut client = Client::connect(&context, endpoint, fast_config(1)).unwrap();
        let started = Instant::now();
        let err = client.request(&Request::new("ping")).unwrap_err();

        assert!(matches!(err, ClientError::Timeout { attempts: 2, .. }));
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(client.metrics().sends(), 2);
        assert_eq!(client.metrics().timeouts(), 2);
        assert_eq!(client.metrics().reconnects(), 3);
    }
}
