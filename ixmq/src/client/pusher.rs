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

//! Fire-and-forget request sender.

use crate::client::ClientError;
use crate::message::Request;
use crate::transport::context::{Attach, SERVICE_LINGER, open};
use crate::transport::frames::send_frames;
use crate::transport::{Context, Endpoint, EndpointKind, Pattern};
use tracing::{debug, trace};

/// Sends requests to a [`ServerKind::Pull`](crate::server::ServerKind::Pull)
/// server without waiting for an answer.
///
/// Nothing comes back, so there is no retry and no way to learn whether a
/// command was known or succeeded. Queued requests are kept for up to a
/// second after the pusher is dropped.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::client::Pusher;
/// use ixmq::message::Request;
/// use ixmq::transport::{Context, Endpoint};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let pusher = Pusher::connect(&context, Endpoint::connect_remote("tcp://indexer:5557"))?;
/// pusher.push(&Request::new("reindex").with_parameter("from", 100))?;
/// # Ok(())
/// # }
/// ```
pub struct Pusher {
    endpoint: Endpoint,
    socket: zmq::Socket,
}

impl Pusher {
    /// Connects to a pull server.
    pub fn connect(context: &Context, endpoint: Endpoint) -> Result<Self, ClientError> {
        let socket = endpoint
            .expect_kind("pusher", &[EndpointKind::ConnectRemote, EndpointKind::InProcess])
            .and_then(|()| open(context, &endpoint, Pattern::Push, Attach::Connect, SERVICE_LINGER))
            .map_err(|source| ClientError::Connection {
                endpoint: endpoint.address().to_string(),
                source,
            })?;
        debug!(endpoint = %endpoint, "pusher connected");
        Ok(Self { endpoint, socket })
    }

    /// The server endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Queues `request` for delivery.
    pub fn push(&self, request: &Request) -> Result<(), ClientError> {
        let blob = request.encode()?;
        send_frames(&self.socket, &[blob.as_bytes()])?;
        trace!(command = %request.command, "request pushed");
        Ok(())
    }
}

impl std::fmt::Debug for Pusher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pusher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
