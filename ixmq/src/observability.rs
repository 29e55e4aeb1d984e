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

//! Observability support for ixmq.
//!
//! Every component exposes an `Arc` to its own counters through a
//! `metrics()` accessor:
//!
//! - [`ClientMetrics`]: requests, send attempts, reconnects, timeouts
//! - [`ServerMetrics`]: received, dispatched, replied, unhandled
//! - [`BrokerMetrics`]: forwarded, relayed, rejected, dropped
//! - [`BroadcastMetrics`]: enqueued and published broadcasts
//!
//! [`ErrorMetrics`] counts errors by layer, and [`log_error`] writes an
//! error to `tracing` with its classification attached.
//!
//! # Metrics export
//!
//! With the `observability` feature the counters are mirrored to the
//! [`metrics`](https://docs.rs/metrics) facade under the `ixmq.` prefix, so
//! any installed recorder (Prometheus, StatsD, ...) picks them up.
//!
//! ```toml
//! [dependencies]
//! ixmq = { version = "0.1", features = ["observability"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use ixmq::IxmqError;
//! use ixmq::observability::ErrorMetrics;
//! use ixmq::transport::TransportError;
//!
//! let metrics = ErrorMetrics::new();
//! metrics.record_error(&IxmqError::Transport(TransportError::Closed));
//! assert_eq!(metrics.transport_errors(), 1);
//! assert_eq!(metrics.total_errors(), 1);
//! ```

mod metrics;

pub use metrics::{BroadcastMetrics, BrokerMetrics, ClientMetrics, ServerMetrics};

use crate::IxmqError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Error counters by layer.
///
/// Safe to share between threads; all updates are atomic.
#[derive(Debug, Default)]
pub struct ErrorMetrics {
    /// Errors rooted in a socket failure
    transport_errors: AtomicU64,
    /// Message codec errors
    codec_errors: AtomicU64,
    /// Component errors without a transport cause
    component_errors: AtomicU64,
    /// Errors that ended a serve loop
    fatal_errors: AtomicU64,
    /// Errors worth retrying
    recoverable_errors: AtomicU64,
}

impl ErrorMetrics {
    /// Creates a zeroed tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error and updates the relevant counters.
    pub fn record_error(&self, error: &IxmqError) {
        if error.is_transport_error() {
            self.transport_errors.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "observability")]
            ::metrics::counter!("ixmq.errors.transport").increment(1);
        } else if matches!(error, IxmqError::Decode(_) | IxmqError::Encode(_)) {
            self.codec_errors.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "observability")]
            ::metrics::counter!("ixmq.errors.codec").increment(1);
        } else {
            self.component_errors.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "observability")]
            ::metrics::counter!("ixmq.errors.component").increment(1);
        }

        if error.is_fatal() {
            self.fatal_errors.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "observability")]
            ::metrics::counter!("ixmq.errors.fatal").increment(1);
        }
        if error.is_recoverable() {
            self.recoverable_errors.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "observability")]
            ::metrics::counter!("ixmq.errors.recoverable").increment(1);
        }
    }

    /// Errors rooted in a socket failure.
    #[must_use]
    pub fn transport_errors(&self) -> u64 {
        self.transport_errors.load(Ordering::Relaxed)
    }

    /// Codec errors.
    #[must_use]
    pub fn codec_errors(&self) -> u64 {
        self.codec_errors.load(Ordering::Relaxed)
    }

    /// Component errors without a transport cause.
    #[must_use]
    pub fn component_errors(&self) -> u64 {
        self.component_errors.load(Ordering::Relaxed)
    }

    /// Errors that ended a serve loop.
    #[must_use]
    pub fn fatal_errors(&self) -> u64 {
        self.fatal_errors.load(Ordering::Relaxed)
    }

    /// Errors worth retrying.
    #[must_use]
    pub fn recoverable_errors(&self) -> u64 {
        self.recoverable_errors.load(Ordering::Relaxed)
    }

    /// Sum of the per-layer counters.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.transport_errors() + self.codec_errors() + self.component_errors()
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.transport_errors.store(0, Ordering::Relaxed);
        self.codec_errors.store(0, Ordering::Relaxed);
        self.component_errors.store(0, Ordering::Relaxed);
        self.fatal_errors.store(0, Ordering::Relaxed);
        self.recoverable_errors.store(0, Ordering::Relaxed);
    }
}

/// Logs an error with its classification as structured fields.
///
/// Fatal errors are logged at `ERROR`, recoverable ones at `WARN` and the
/// rest at `INFO`.
///
/// # Examples
///
/// ```rust
/// use ixmq::IxmqError;
/// use ixmq::observability::log_error;
/// use ixmq::transport::TransportError;
///
/// log_error(&IxmqError::Transport(TransportError::Closed));
/// ```
pub fn log_error(error: &IxmqError) {
    let fatal = error.is_fatal();
    let recoverable = error.is_recoverable();
    let transport = error.is_transport_error();

    if fatal {
        tracing::error!(error = %error, recoverable, transport, "fatal error");
    } else if recoverable {
        tracing::warn!(error = %error, transport, "recoverable error");
    } else {
        tracing::info!(error = %error, transport, "error");
    }
}
