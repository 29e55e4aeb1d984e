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

//! Router/dealer broker.

use crate::broker::{RoutingError, RoutingTable};
use crate::message::Reply;
use crate::observability::BrokerMetrics;
use crate::transport::context::{Attach, SERVICE_LINGER, open};
use crate::transport::frames::{recv_partial, send_frames, timeout_millis};
use crate::transport::{
    Context, Endpoint, EndpointKind, Pattern, SERVE_TICK, ShutdownHandle, TransportError,
};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

/// Frames a routable frontend message must have:
/// `[identity, delimiter, label, payload...]`.
const MIN_FRONTEND_FRAMES: usize = 4;

/// Frames needed to address a reply: `[identity, delimiter]`.
const ENVELOPE_FRAMES: usize = 2;

const UNENCODABLE_REPLY: &str =
    r#"{"status":"fail","message":"broker could not encode its reply","parameters":{}}"#;

/// Forwards client requests to backend services by command name or tag.
///
/// Clients connect to the ROUTER frontend and send
/// `[label, request-blob]` (see [`Routing`](crate::client::Routing)). The
/// broker looks the label up in its [`RoutingTable`] and forwards the whole
/// frame stack, envelope included, to that destination's DEALER connection.
/// Backend replies carry the envelope back and are relayed to the frontend
/// untouched, so backends need no knowledge of the broker.
///
/// Messages that cannot be routed are answered with a FAIL reply when the
/// envelope allows it and the broker keeps serving.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::broker::Broker;
/// use ixmq::transport::{Context, Endpoint};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let mut broker = Broker::new(&context, Endpoint::bind_local("tcp://*:5560"))?;
/// broker.register(
///     Endpoint::connect_remote("tcp://eth-categorizer:5555"),
///     &["ethereum"],
/// )?;
/// broker.register(
///     Endpoint::connect_remote("tcp://db:5555"),
///     &["db_read", "db_write"],
/// )?;
/// broker.serve()?;
/// # Ok(())
/// # }
/// ```
pub struct Broker {
    context: Context,
    endpoint: Endpoint,
    frontend: zmq::Socket,
    routes: RoutingTable,
    shutdown: ShutdownHandle,
    metrics: Arc<BrokerMetrics>,
}

impl Broker {
    /// Binds the frontend.
    pub fn new(context: &Context, frontend: Endpoint) -> Result<Self, RoutingError> {
        frontend.expect_kind("broker", &[EndpointKind::BindLocal, EndpointKind::InProcess])?;
        let socket = open(context, &frontend, Pattern::Router, Attach::Bind, SERVICE_LINGER)?;
        info!(endpoint = %frontend, "broker bound");

        Ok(Self {
            context: context.clone(),
            endpoint: frontend,
            frontend: socket,
            routes: RoutingTable::new(),
            shutdown: ShutdownHandle::new(),
            metrics: Arc::new(BrokerMetrics::new()),
        })
    }

    /// Routes `commands` to `destination`.
    ///
    /// The backend connection is created when [`serve`](Self::serve) starts.
    pub fn register<S: AsRef<str>>(
        &mut self,
        destination: Endpoint,
        commands: &[S],
    ) -> Result<usize, RoutingError> {
        destination.expect_kind(
            "broker destination",
            &[EndpointKind::ConnectRemote, EndpointKind::InProcess],
        )?;
        let address = destination.address().to_string();
        let index = self.routes.register(destination, commands)?;
        debug!(destination = %address, commands = commands.len(), index, "destination registered");
        Ok(index)
    }

    /// The frontend endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The routing table built so far.
    pub fn routes(&self) -> &RoutingTable {
        &self.routes
    }

    /// Handle that stops [`serve`](Self::serve) from another thread.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Shared handle to this broker's counters.
    pub fn metrics(&self) -> Arc<BrokerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Connects the backends and forwards messages until shutdown.
    ///
    /// Consumes the broker, so the routing table is fixed from here on.
    /// Returns `Ok(())` on shutdown or context termination and
    /// [`RoutingError::Transport`] when a socket fails.
    pub fn serve(self) -> Result<(), RoutingError> {
        let span = info_span!("broker", endpoint = %self.endpoint);
        let _entered = span.enter();

        let backends = self
            .routes
            .destinations()
            .iter()
            .map(|destination| {
                open(
                    &self.context,
                    destination,
                    Pattern::Dealer,
                    Attach::Connect,
                    SERVICE_LINGER,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(backends = backends.len(), routes = self.routes.len(), "serving");

        match self.run(&backends) {
            Err(RoutingError::Transport(TransportError::Closed)) => {
                info!("context terminated");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "broker stopped");
                Err(e)
            }
            Ok(()) => {
                info!("shutdown requested");
                Ok(())
            }
        }
    }

    fn run(&self, backends: &[zmq::Socket]) -> Result<(), RoutingError> {
        let mut ready = vec![false; backends.len() + 1];
        while !self.shutdown.is_triggered() {
            {
                let mut items: Vec<zmq::PollItem<'_>> = std::iter::once(&self.frontend)
                    .chain(backends)
                    .map(|socket| socket.as_poll_item(zmq::POLLIN))
                    .collect();
                zmq::poll(&mut items, timeout_millis(SERVE_TICK)).map_err(TransportError::poll)?;
                for (flag, item) in ready.iter_mut().zip(&items) {
                    *flag = item.is_readable();
                }
            }

            if ready[0] {
                self.handle_frontend(backends)?;
            }
            for (backend, _) in backends.iter().zip(&ready[1..]).filter(|(_, ready)| **ready) {
                self.relay(backend)?;
            }
        }
        Ok(())
    }

    /// Forwards one frontend message or answers it with a FAIL reply.
    fn handle_frontend(&self, backends: &[zmq::Socket]) -> Result<(), RoutingError> {
        let (frames, failure) = recv_partial(&self.frontend);
        match failure {
            Some(TransportError::Closed) => return Err(TransportError::Closed.into()),
            Some(e) => {
                warn!(error = %e, frames = frames.len(), "frontend receive failed");
                return self.reject(&frames, &e.to_string());
            }
            None => {}
        }

        if frames.len() < MIN_FRONTEND_FRAMES {
            let rejection = RoutingError::MalformedEnvelope {
                frames: frames.len(),
            };
            warn!(error = %rejection, "rejecting short message");
            return self.reject(&frames, &rejection.to_string());
        }

        let label = String::from_utf8_lossy(&frames[2]);
        let Some(index) = self.routes.destination_for(&label) else {
            let rejection = RoutingError::UnknownRoute {
                label: label.into_owned(),
            };
            warn!(error = %rejection, "rejecting unroutable message");
            return self.reject(&frames, &rejection.to_string());
        };

        debug!(label = %label, destination = index, frames = frames.len(), "forwarding");
        send_frames(&backends[index], &frames)?;
        self.metrics.record_forwarded();
        Ok(())
    }

    /// Best-effort FAIL reply to whatever envelope was read.
    fn reject(&self, frames: &[Vec<u8>], reason: &str) -> Result<(), RoutingError> {
        if frames.len() < ENVELOPE_FRAMES {
            self.metrics.record_dropped();
            let malformed = RoutingError::MalformedEnvelope {
                frames: frames.len(),
            };
            warn!(error = %malformed, reason, "cannot address a reply, dropping message");
            return Ok(());
        }

        let blob = Reply::fail(reason).encode().unwrap_or_else(|e| {
            error!(error = %e, "rejection could not be encoded");
            UNENCODABLE_REPLY.to_string()
        });
        let reply = [
            frames[0].as_slice(),
            frames[1].as_slice(),
            blob.as_bytes(),
        ];
        match send_frames(&self.frontend, &reply) {
            Ok(()) => {
                self.metrics.record_rejected();
                Ok(())
            }
            Err(TransportError::Closed) => Err(TransportError::Closed.into()),
            Err(e) => {
                self.metrics.record_dropped();
                warn!(error = %e, "rejection reply could not be sent");
                Ok(())
            }
        }
    }

    /// Copies one backend reply to the frontend, frame by frame.
    fn relay(&self, backend: &zmq::Socket) -> Result<(), RoutingError> {
        let mut frames = 0usize;
        loop {
            let message = backend.recv_msg(0).map_err(TransportError::receive)?;
            let more = message.get_more();
            let flags = if more { zmq::SNDMORE } else { 0 };
            self.frontend
                .send(message, flags)
                .map_err(TransportError::send)?;
            frames += 1;
            if !more {
                break;
            }
        }
        self.metrics.record_relayed();
        debug!(frames, "reply relayed");
        Ok(())
    }
}

impl std::fmt::Debug for Broker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broker")
            .field("endpoint", &self.endpoint)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
