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

//! Subscribe-mode client for broadcasts.

use crate::client::ClientError;
use crate::message::Broadcast;
use crate::transport::context::{Attach, DISCARD_LINGER, open};
use crate::transport::frames::{poll_readable, recv_frames};
use crate::transport::{Context, Endpoint, EndpointKind, Pattern, TransportError};
use std::time::Duration;
use tracing::debug;

/// Receives [`Broadcast`]s from a [`Broadcaster`](crate::broadcast::Broadcaster).
///
/// Topics are prefix filters. An empty topic list subscribes to everything.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::client::Subscriber;
/// use ixmq::transport::{Context, Endpoint};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let subscriber = Subscriber::connect(
///     &context,
///     Endpoint::subscribe("tcp://localhost:5556"),
///     &["blocks"],
/// )?;
/// let broadcast = subscriber.recv()?;
/// println!("{}: {:?}", broadcast.topic, broadcast.reply.parameters);
/// # Ok(())
/// # }
/// ```
pub struct Subscriber {
    endpoint: Endpoint,
    socket: zmq::Socket,
}

impl Subscriber {
    /// Connects to a publisher and subscribes to `topics`.
    pub fn connect<T: AsRef<str>>(
        context: &Context,
        endpoint: Endpoint,
        topics: &[T],
    ) -> Result<Self, ClientError> {
        let connection_error = |source| ClientError::Connection {
            endpoint: endpoint.address().to_string(),
            source,
        };

        endpoint
            .expect_kind(
                "subscriber",
                &[EndpointKind::Subscribe, EndpointKind::InProcess],
            )
            .map_err(connection_error)?;
        let socket = open(context, &endpoint, Pattern::Sub, Attach::Connect, DISCARD_LINGER)
            .map_err(connection_error)?;

        if topics.is_empty() {
            subscribe(&socket, "").map_err(connection_error)?;
        }
        for topic in topics {
            subscribe(&socket, topic.as_ref()).map_err(connection_error)?;
        }

        debug!(endpoint = %endpoint, topics = topics.len(), "subscriber connected");
        Ok(Self { endpoint, socket })
    }

    /// The publisher endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Blocks until the next broadcast arrives.
    pub fn recv(&self) -> Result<Broadcast, ClientError> {
        let frames = recv_frames(&self.socket)?;
        Ok(Broadcast::from_frames(&frames)?)
    }

    /// Waits up to `timeout` for the next broadcast.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Broadcast>, ClientError> {
        if !poll_readable(&self.socket, timeout)? {
            return Ok(None);
        }
        self.recv().map(Some)
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

fn subscribe(socket: &zmq::Socket, topic: &str) -> Result<(), TransportError> {
    socket.set_subscribe(topic.as_bytes()).map_err(|source| {
        TransportError::invalid_configuration(format!("subscribe to {topic:?} failed: {source}"))
    })
}
