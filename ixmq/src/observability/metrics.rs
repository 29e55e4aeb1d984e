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

//! Per-component metrics.
//!
//! Counters are plain atomics so they can be read from any thread while the
//! owning component runs. With the `observability` feature enabled every
//! update is mirrored to the [`metrics`](https://docs.rs/metrics) facade.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for a [`Client`](crate::client::Client).
///
/// # Examples
///
/// ```rust
/// use ixmq::observability::ClientMetrics;
///
/// let metrics = ClientMetrics::new();
/// metrics.record_request();
/// metrics.record_send();
/// metrics.record_send();
/// metrics.record_timeout();
///
/// assert_eq!(metrics.requests(), 1);
/// assert_eq!(metrics.sends(), 2);
/// assert_eq!(metrics.retries(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Logical requests started
    requests: AtomicU64,
    /// Individual send attempts, including retries
    sends: AtomicU64,
    /// Socket recreations
    reconnects: AtomicU64,
    /// Polls that expired without a reply
    timeouts: AtomicU64,
    /// FAIL replies received
    remote_failures: AtomicU64,
}

impl ClientMetrics {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a logical request.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.client.requests").increment(1);
    }

    /// Records one send attempt.
    pub fn record_send(&self) {
        self.sends.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.client.sends").increment(1);
    }

    /// Records a socket recreation.
    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.client.reconnects").increment(1);
    }

    /// Records a poll that expired.
    pub fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.client.timeouts").increment(1);
    }

    /// Records a FAIL reply.
    pub fn record_remote_failure(&self) {
        self.remote_failures.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.client.remote_failures").increment(1);
    }

    /// Logical requests started.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Send attempts, including retries.
    #[must_use]
    pub fn sends(&self) -> u64 {
        self.sends.load(Ordering::Relaxed)
    }

    /// Send attempts beyond the first of each request.
    #[must_use]
    pub fn retries(&self) -> u64 {
        self.sends().saturating_sub(self.requests())
    }

    /// Socket recreations.
    #[must_use]
    pub fn reconnects(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    /// Polls that expired without a reply.
    #[must_use]
    pub fn timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// FAIL replies received.
    #[must_use]
    pub fn remote_failures(&self) -> u64 {
        self.remote_failures.load(Ordering::Relaxed)
    }
}

/// Metrics for a command dispatch [`Server`](crate::server::Server).
///
/// # Examples
///
/// ```rust
/// use ixmq::observability::ServerMetrics;
///
/// let metrics = ServerMetrics::new();
/// metrics.record_received();
/// metrics.record_dispatched();
/// metrics.record_replied();
///
/// assert_eq!(metrics.received(), 1);
/// assert_eq!(metrics.unhandled(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ServerMetrics {
    received: AtomicU64,
    dispatched: AtomicU64,
    replied: AtomicU64,
    decode_failures: AtomicU64,
    unhandled: AtomicU64,
}

impl ServerMetrics {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a received message.
    pub fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.server.received").increment(1);
    }

    /// Records a request handed to a handler.
    pub fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.server.dispatched").increment(1);
    }

    /// Records a reply sent back.
    pub fn record_replied(&self) {
        self.replied.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.server.replied").increment(1);
    }

    /// Records a message that could not be parsed as a request.
    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.server.decode_failures").increment(1);
    }

    /// Records a request with no registered handler.
    pub fn record_unhandled(&self) {
        self.unhandled.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.server.unhandled").increment(1);
    }

    /// Messages received.
    #[must_use]
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Requests handed to a handler.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Replies sent.
    #[must_use]
    pub fn replied(&self) -> u64 {
        self.replied.load(Ordering::Relaxed)
    }

    /// Messages that failed to parse.
    #[must_use]
    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// Requests with no registered handler.
    #[must_use]
    pub fn unhandled(&self) -> u64 {
        self.unhandled.load(Ordering::Relaxed)
    }
}

/// Metrics for a [`Broker`](crate::broker::Broker).
#[derive(Debug, Default)]
pub struct BrokerMetrics {
    forwarded: AtomicU64,
    relayed: AtomicU64,
    rejected: AtomicU64,
    dropped: AtomicU64,
}

impl BrokerMetrics {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frontend message forwarded to a backend.
    pub fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broker.forwarded").increment(1);
    }

    /// Records a backend reply relayed to the frontend.
    pub fn record_relayed(&self) {
        self.relayed.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broker.relayed").increment(1);
    }

    /// Records a frontend message answered with a FAIL reply.
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broker.rejected").increment(1);
    }

    /// Records a frontend message that could not be answered at all.
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broker.dropped").increment(1);
    }

    /// Messages forwarded to backends.
    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    /// Replies relayed to clients.
    #[must_use]
    pub fn relayed(&self) -> u64 {
        self.relayed.load(Ordering::Relaxed)
    }

    /// Messages answered with a FAIL reply.
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Messages that could not be answered.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Metrics for a [`Broadcaster`](crate::broadcast::Broadcaster).
#[derive(Debug, Default)]
pub struct BroadcastMetrics {
    enqueued: AtomicU64,
    published: AtomicU64,
}

impl BroadcastMetrics {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a broadcast accepted onto the delivery channel.
    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broadcast.enqueued").increment(1);
    }

    /// Records a broadcast written to the publish socket.
    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("ixmq.broadcast.published").increment(1);
    }

    /// Broadcasts accepted from publishers.
    #[must_use]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Broadcasts written to the socket.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Broadcasts accepted but not yet written.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.enqueued().saturating_sub(self.published())
    }
}
