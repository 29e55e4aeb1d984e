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

//! Synchronous command dispatch server.

use crate::message::{Reply, Request};
use crate::observability::ServerMetrics;
use crate::server::{HandlerTable, ServerError};
use crate::transport::context::{Attach, SERVICE_LINGER, open};
use crate::transport::frames::{Multipart, poll_readable, recv_with_metadata, send_frames};
use crate::transport::{
    Context, Endpoint, EndpointKind, Pattern, SERVE_TICK, ShutdownHandle, TransportError,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

/// Sent when even a fallback reply cannot be encoded.
const UNENCODABLE_REPLY: &str =
    r#"{"status":"fail","message":"reply could not be encoded","parameters":{}}"#;

/// Which socket pattern a server listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerKind {
    /// Request-reply: every request gets a reply.
    Reply,
    /// Fire-and-forget: requests are pulled and never answered.
    Pull,
}

impl ServerKind {
    /// Returns `true` if the server sends replies.
    pub fn can_reply(&self) -> bool {
        matches!(self, Self::Reply)
    }

    fn pattern(&self) -> Pattern {
        match self {
            Self::Reply => Pattern::Rep,
            Self::Pull => Pattern::Pull,
        }
    }
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply => f.write_str("reply"),
            Self::Pull => f.write_str("pull"),
        }
    }
}

/// A bound command dispatch server.
///
/// [`bind`](Self::bind) creates and binds the socket; [`serve`](Self::serve)
/// consumes the server and processes requests one at a time, in arrival
/// order, until shutdown or a transport failure.
///
/// For each message the server:
///
/// 1. skips a leading routing label frame, if a broker added one
/// 2. decodes the [`Request`] and attaches the caller's authenticated key
/// 3. runs the registered handler inside a `command` span
/// 4. sends the reply back (reply servers only)
///
/// Undecodable requests and unknown commands get a FAIL reply and the loop
/// keeps going. Transport failures end the loop with
/// [`ServerError::Transport`].
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::message::{Reply, Request};
/// use ixmq::server::{HandlerTable, Server, ServerKind};
/// use ixmq::transport::{Context, Endpoint};
/// use tracing::Span;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let handlers = HandlerTable::new()
///     .with("echo", |request: Request, _span: &Span, _ctx: &()| {
///         Reply::ok(request.parameters)
///     })?;
///
/// let context = Context::new();
/// let server = Server::bind(
///     &context,
///     Endpoint::bind_local("tcp://*:5555"),
///     ServerKind::Reply,
///     handlers,
/// )?;
/// server.serve(&())?;
/// # Ok(())
/// # }
/// ```
pub struct Server<C> {
    endpoint: Endpoint,
    kind: ServerKind,
    socket: zmq::Socket,
    handlers: HandlerTable<C>,
    shutdown: ShutdownHandle,
    metrics: Arc<ServerMetrics>,
}

impl<C> Server<C> {
    /// Binds a server to a local or in-process endpoint.
    pub fn bind(
        context: &Context,
        endpoint: Endpoint,
        kind: ServerKind,
        handlers: HandlerTable<C>,
    ) -> Result<Self, ServerError> {
        let socket = endpoint
            .expect_kind("server", &[EndpointKind::BindLocal, EndpointKind::InProcess])
            .and_then(|()| open(context, &endpoint, kind.pattern(), Attach::Bind, SERVICE_LINGER))
            .map_err(|source| ServerError::Bind {
                endpoint: endpoint.address().to_string(),
                source,
            })?;

        info!(endpoint = %endpoint, kind = %kind, handlers = handlers.len(), "server bound");

        Ok(Self {
            endpoint,
            kind,
            socket,
            handlers,
            shutdown: ShutdownHandle::new(),
            metrics: Arc::new(ServerMetrics::new()),
        })
    }

    /// The bound endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The socket pattern in use.
    pub fn kind(&self) -> ServerKind {
        self.kind
    }

    /// Handle that stops [`serve`](Self::serve) from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Shared handle to this server's counters.
    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Serves requests until shutdown.
    ///
    /// Returns `Ok(())` after [`ShutdownHandle::trigger`] or when the context
    /// is terminated. Any other transport failure is returned as
    /// [`ServerError::Transport`]; the server is gone at that point and the
    /// owner is expected to rebuild it.
    pub fn serve(self, context: &C) -> Result<(), ServerError> {
        let span = info_span!("server", endpoint = %self.endpoint, kind = %self.kind);
        let _entered = span.enter();
        info!("serving");

        loop {
            if self.shutdown.is_triggered() {
                info!("shutdown requested");
                return Ok(());
            }

            let multipart = match poll_readable(&self.socket, SERVE_TICK)
                .and_then(|ready| ready.then(|| recv_with_metadata(&self.socket)).transpose())
            {
                Ok(Some(multipart)) => multipart,
                Ok(None) => continue,
                Err(TransportError::Closed) => {
                    info!("context terminated");
                    return Ok(());
                }
                Err(e) => {
                    error!(error = %e, "receive failed");
                    return Err(e.into());
                }
            };

            self.metrics.record_received();
            let reply = self.dispatch(multipart, context);

            if self.kind.can_reply() {
                let blob = reply.encode().unwrap_or_else(|e| {
                    error!(error = %e, "reply could not be encoded");
                    UNENCODABLE_REPLY.to_string()
                });
                if let Err(e) = send_frames(&self.socket, &[blob.as_bytes()]) {
                    if matches!(e, TransportError::Closed) {
                        info!("context terminated");
                        return Ok(());
                    }
                    error!(error = %e, "send failed");
                    return Err(e.into());
                }
                self.metrics.record_replied();
            }
        }
    }

    fn dispatch(&self, multipart: Multipart, context: &C) -> Reply {
        let payload = strip_label(&multipart.frames);

        let mut request = match Request::from_frames(payload) {
            Ok(request) => request,
            Err(e) => {
                self.metrics.record_decode_failure();
                warn!(error = %e, frames = multipart.frames.len(), "undecodable request");
                return Reply::fail(format!("invalid request: {e}"));
            }
        };
        request.public_key = multipart.user_id;

        let Some(handler) = self.handlers.get(&request.command) else {
            self.metrics.record_unhandled();
            warn!(command = %request.command, "handler not found");
            return Reply::fail(format!("handler not found for command: {}", request.command));
        };

        let command = request.command.clone();
        let span = info_span!("command", command = %command);
        self.metrics.record_dispatched();
        let reply = span.in_scope(|| handler.handle(request, &span, context));

        match reply.validate() {
            Ok(()) => {
                debug!(command = %command, status = %reply.status, "handled");
                reply
            }
            Err(e) => {
                error!(command = %command, error = %e, "handler returned an invalid reply");
                Reply::fail(format!("handler for {command} returned an invalid reply: {e}"))
            }
        }
    }
}

impl<C> fmt::Debug for Server<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("endpoint", &self.endpoint)
            .field("kind", &self.kind)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// Drops a leading routing label. A label is any first frame that is not
/// the start of a JSON object and is followed by more frames.
fn strip_label(frames: &[Vec<u8>]) -> &[Vec<u8>] {
    match frames.split_first() {
        Some((first, rest)) if !rest.is_empty() && !first.starts_with(b"{") => rest,
        _ => frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Parameters;
    use tracing::Span;

    fn frames(parts: &[&str]) -> Vec<Vec<u8>> {
        parts.iter().map(|p| p.as_bytes().to_vec()).collect()
    }

    fn echo_server(name: &str, kind: ServerKind) -> Server<()> {
        let handlers = HandlerTable::new()
            .with("echo", |request: Request, _: &Span, _: &()| {
                Reply::ok(request.parameters)
            })
            .unwrap()
            .with("broken", |_: Request, _: &Span, _: &()| Reply::fail(""))
            .unwrap()
            .with("whoami", |request: Request, _: &Span, _: &()| {
                Reply::ok(Parameters::new().with("key", request.public_key))
            })
            .unwrap()
            .with("ratio", |_: Request, _: &Span, _: &()| {
                Reply::ok(Parameters::new().with("ratio", f64::NAN))
            })
            .unwrap();
        Server::bind(&Context::new(), Endpoint::in_process(name), kind, handlers).unwrap()
    }

    #[test]
    fn test_strip_label() {
        let routed = frames(&["categorize", "{\"a\":1}"]);
        assert_eq!(strip_label(&routed).len(), 1);

        let fragmented = frames(&["{\"command\":", "\"x\"}"]);
        assert_eq!(strip_label(&fragmented).len(), 2);

        let single = frames(&["not-json"]);
        assert_eq!(strip_label(&single).len(), 1);
    }

    #[test]
    fn test_dispatch_echo() {
        let server = echo_server("server-echo", ServerKind::Reply);
        let blob = Request::new("echo").with_parameter("counter", 3).encode().unwrap();
        let reply = server.dispatch(
            Multipart {
                frames: frames(&["tag", blob.as_str()]),
                user_id: None,
            },
            &(),
        );
        assert!(reply.is_ok());
        assert_eq!(reply.parameters.get_i64("counter"), Some(3));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let server = echo_server("server-unknown", ServerKind::Pull);
        let blob = Request::new("missing").encode().unwrap();
        let reply = server.dispatch(
            Multipart {
                frames: frames(&[blob.as_str()]),
                user_id: None,
            },
            &(),
        );
        assert_eq!(reply.message, "handler not found for command: missing");
        assert_eq!(server.metrics().unhandled(), 1);
    }

    #[test]
    fn test_dispatch_invalid_reply_replaced() {
        let server = echo_server("server-broken", ServerKind::Reply);
        let blob = Request::new("broken").encode().unwrap();
        let reply = server.dispatch(
            Multipart {
                frames: frames(&[blob.as_str()]),
                user_id: None,
            },
            &(),
        );
        assert!(!reply.is_ok());
        assert!(reply.message.contains("broken"));
        assert!(reply.validate().is_ok());
    }

    #[test]
    fn test_dispatch_unencodable_number_replaced() {
        let server = echo_server("server-nan", ServerKind::Reply);
        let blob = Request::new("ratio").encode().unwrap();
        let reply = server.dispatch(
            Multipart {
                frames: frames(&[blob.as_str()]),
                user_id: None,
            },
            &(),
        );
        assert!(!reply.is_ok());
        assert!(reply.message.contains("non-finite number in parameter ratio"));
        assert!(reply.encode().is_ok());
    }

    #[test]
    fn test_dispatch_attaches_public_key() {
        let server = echo_server("server-key", ServerKind::Reply);
        let blob = Request::new("whoami").encode().unwrap();
        let reply = server.dispatch(
            Multipart {
                frames: frames(&[blob.as_str()]),
                user_id: Some("client-public-key".to_string()),
            },
            &(),
        );
        assert_eq!(reply.parameters.get_str("key"), Some("client-public-key"));
    }

    #[test]
    fn test_dispatch_malformed_request() {
        let server = echo_server("server-malformed", ServerKind::Reply);
        let reply = server.dispatch(
            Multipart {
                frames: frames(&["{oops"]),
                user_id: None,
            },
            &(),
        );
        assert!(reply.message.starts_with("invalid request"));
        assert_eq!(server.metrics().decode_failures(), 1);
    }

    #[test]
    fn test_connect_endpoint_rejected() {
        let err = Server::<()>::bind(
            &Context::new(),
            Endpoint::connect_remote("tcp://localhost:1"),
            ServerKind::Reply,
            HandlerTable::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }

    #[test]
    fn test_shutdown_before_serve() {
        let server = echo_server("server-shutdown", ServerKind::Reply);
        server.shutdown_handle().trigger();
        assert!(server.serve(&()).is_ok());
    }
}
