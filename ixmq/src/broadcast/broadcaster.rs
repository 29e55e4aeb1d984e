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

//! Single-owner publisher.

use crate::broadcast::BroadcastError;
use crate::message::{Broadcast, Reply};
use crate::observability::BroadcastMetrics;
use crate::transport::context::{Attach, SERVICE_LINGER, open};
use crate::transport::frames::send_frames;
use crate::transport::{Context, Endpoint, EndpointKind, Pattern, TransportError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

/// Owns a PUB socket and publishes broadcasts from any number of producers.
///
/// PUB sockets must not be used from several threads at once, so producers
/// never touch the socket. They hold a [`Publisher`] and enqueue
/// broadcasts; [`run`](Self::run) drains the queue on a single thread and
/// writes each one as `[topic, reply-blob]`, holding the socket lock for the
/// whole multipart send.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::broadcast::Broadcaster;
/// use ixmq::message::{Parameters, Reply};
/// use ixmq::transport::{Context, Endpoint};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let broadcaster = Broadcaster::new(&context, Endpoint::publish("tcp://*:5556"))?;
/// let publisher = broadcaster.publisher();
///
/// let owner = std::thread::spawn(move || broadcaster.run());
///
/// publisher.publish("blocks", Reply::ok(Parameters::new().with("height", 1)))?;
/// drop(publisher);
/// owner.join().unwrap()?;
/// # Ok(())
/// # }
/// ```
pub struct Broadcaster {
    endpoint: Endpoint,
    socket: Mutex<zmq::Socket>,
    sender: mpsc::UnboundedSender<Broadcast>,
    receiver: mpsc::UnboundedReceiver<Broadcast>,
    metrics: Arc<BroadcastMetrics>,
}

impl Broadcaster {
    /// Binds the publish socket.
    pub fn new(context: &Context, endpoint: Endpoint) -> Result<Self, BroadcastError> {
        endpoint.expect_kind(
            "broadcaster",
            &[EndpointKind::Publish, EndpointKind::InProcess],
        )?;
        let socket = open(context, &endpoint, Pattern::Pub, Attach::Bind, SERVICE_LINGER)?;
        let (sender, receiver) = mpsc::unbounded_channel();
        info!(endpoint = %endpoint, "broadcaster bound");

        Ok(Self {
            endpoint,
            socket: Mutex::new(socket),
            sender,
            receiver,
            metrics: Arc::new(BroadcastMetrics::new()),
        })
    }

    /// Creates a producer handle.
    pub fn publisher(&self) -> Publisher {
        Publisher {
            sender: self.sender.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// The bound endpoint.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Shared handle to this broadcaster's counters.
    pub fn metrics(&self) -> Arc<BroadcastMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Publishes queued broadcasts until every [`Publisher`] is dropped.
    ///
    /// Blocks the calling thread. Call it from a dedicated thread or
    /// `tokio::task::spawn_blocking`, never from inside an async task.
    ///
    /// A failed send stops the broadcaster with
    /// [`BroadcastError::Transport`].
    pub fn run(self) -> Result<(), BroadcastError> {
        let Self {
            endpoint,
            socket,
            sender,
            mut receiver,
            metrics,
        } = self;
        drop(sender);

        info!(endpoint = %endpoint, "broadcaster running");
        while let Some(broadcast) = receiver.blocking_recv() {
            let frames = match broadcast.to_frames() {
                Ok(frames) => frames,
                Err(e) => {
                    error!(topic = %broadcast.topic, error = %e, "dropping unencodable broadcast");
                    continue;
                }
            };

            let sent = send_frames(&socket.lock(), &frames);
            match sent {
                Ok(()) => {
                    metrics.record_published();
                    trace!(topic = %broadcast.topic, "published");
                }
                Err(TransportError::Closed) => {
                    info!("context terminated");
                    return Ok(());
                }
                Err(e) => {
                    error!(topic = %broadcast.topic, error = %e, "publish failed");
                    return Err(e.into());
                }
            }
        }

        debug!(published = metrics.published(), "all publishers dropped");
        Ok(())
    }
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Enqueues broadcasts for a [`Broadcaster`].
///
/// Cheap to clone and safe to share across threads and tasks.
#[derive(Debug, Clone)]
pub struct Publisher {
    sender: mpsc::UnboundedSender<Broadcast>,
    metrics: Arc<BroadcastMetrics>,
}

impl Publisher {
    /// Validates and enqueues a broadcast.
    ///
    /// An invalid reply is rejected here, before it reaches the socket
    /// owner.
    pub fn publish(&self, topic: impl Into<String>, reply: Reply) -> Result<(), BroadcastError> {
        self.send(Broadcast::new(topic, reply))
    }

    /// Validates and enqueues a prepared broadcast.
    pub fn send(&self, broadcast: Broadcast) -> Result<(), BroadcastError> {
        broadcast.validate()?;
        self.sender
            .send(broadcast)
            .map_err(|_| BroadcastError::Closed)?;
        self.metrics.record_enqueued();
        Ok(())
    }

    /// Returns `true` once the broadcaster has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{EncodeError, Parameters};

    #[test]
    fn test_subscribe_endpoint_rejected() {
        let err = Broadcaster::new(&Context::new(), Endpoint::subscribe("tcp://localhost:1"))
            .unwrap_err();
        assert!(matches!(
            err,
            BroadcastError::Transport(TransportError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_reply_rejected_eagerly() {
        let broadcaster =
            Broadcaster::new(&Context::new(), Endpoint::in_process("broadcast-invalid")).unwrap();
        let publisher = broadcaster.publisher();

        let err = publisher.publish("t", Reply::fail("")).unwrap_err();
        assert!(matches!(err, BroadcastError::Encode(EncodeError::InvalidReply)));
        assert_eq!(broadcaster.metrics().enqueued(), 0);
    }

    #[test]
    fn test_run_drains_then_stops() {
        let broadcaster =
            Broadcaster::new(&Context::new(), Endpoint::in_process("broadcast-drain")).unwrap();
        let metrics = broadcaster.metrics();
        let publisher = broadcaster.publisher();
        for height in 0..3 {
            publisher
                .publish("blocks", Reply::ok(Parameters::new().with("height", height)))
                .unwrap();
        }
        drop(publisher);

        broadcaster.run().unwrap();
        assert_eq!(metrics.published(), 3);
        assert_eq!(metrics.pending(), 0);
    }

    #[test]
    fn test_run_on_owner_thread_with_many_producers() {
        let broadcaster =
            Broadcaster::new(&Context::new(), Endpoint::in_process("broadcast-owner")).unwrap();
        let metrics = broadcaster.metrics();
        let producers: Vec<_> = (0..4)
            .map(|producer: i64| {
                let publisher = broadcaster.publisher();
                std::thread::spawn(move || {
                    for n in 0..10i64 {
                        let params = Parameters::new().with("producer", producer).with("n", n);
                        publisher.publish("ticks", Reply::ok(params)).unwrap();
                    }
                })
            })
            .collect();

        let owner = std::thread::spawn(move || broadcaster.run());
        for producer in producers {
            producer.join().unwrap();
        }
        owner.join().unwrap().unwrap();

        assert_eq!(metrics.enqueued(), 40);
        assert_eq!(metrics.published(), 40);
    }

    #[test]
    fn test_publish_after_stop() {
        let broadcaster =
            Broadcaster::new(&Context::new(), Endpoint::in_process("broadcast-stopped")).unwrap();
        let publisher = broadcaster.publisher();
        drop(broadcaster);

        assert!(publisher.is_closed());
        let err = publisher
            .publish("t", Reply::ok(Parameters::new()))
            .unwrap_err();
        assert!(matches!(err, BroadcastError::Closed));
    }
}
