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

//! Transport layer error types.
//!
//! Transport errors are the lowest level of the error hierarchy and describe
//! failures of the underlying libzmq sockets: creating them, attaching them to
//! an address, and moving frames through them.
//!
//! # Recovery Strategy
//!
//! - A client that hits a transport error gives up on the current request and
//!   reports the error to its caller.
//! - A serve loop (server, broker, broadcaster) that hits a transport error
//!   terminates and hands the error to its owner, which is expected to
//!   restart it (see [`crate::supervisor`]).

use thiserror::Error;

/// Errors that can occur in the transport layer.
///
/// # Examples
///
/// ```rust
/// use ixmq::transport::TransportError;
///
/// let error = TransportError::InvalidConfiguration {
///     reason: "subscribe endpoints cannot serve requests".to_string(),
/// };
/// assert!(!error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum TransportError {
    /// The socket could not be created from the context.
    #[error("failed to create {pattern} socket: {source}")]
    SocketFailed {
        /// Name of the socket pattern that was requested
        pattern: &'static str,
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Failed to connect to the remote endpoint.
    #[error("failed to connect to {address}: {source}")]
    ConnectionFailed {
        /// The address that failed to connect
        address: String,
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Failed to bind to the specified address.
    ///
    /// Typically the address is already in use or malformed.
    #[error("failed to bind to {address}: {source}")]
    BindFailed {
        /// The address that failed to bind
        address: String,
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Failed to send a frame.
    #[error("send failed: {source}")]
    SendFailed {
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Failed to receive a frame.
    #[error("receive failed: {source}")]
    ReceiveFailed {
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Polling the socket set failed.
    #[error("poll failed: {source}")]
    PollFailed {
        /// The underlying libzmq error
        #[source]
        source: zmq::Error,
    },

    /// Invalid socket or endpoint configuration.
    ///
    /// Indicates a programming or deployment error and is never retried.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
    },

    /// The context owning the socket was terminated.
    #[error("transport is closed")]
    Closed,
}

impl TransportError {
    /// Maps a send failure, folding context termination into [`TransportError::Closed`].
    pub(crate) fn send(source: zmq::Error) -> Self {
        match source {
            zmq::Error::ETERM => Self::Closed,
            source => Self::SendFailed { source },
        }
    }

    /// Maps a receive failure, folding context termination into [`TransportError::Closed`].
    pub(crate) fn receive(source: zmq::Error) -> Self {
        match source {
            zmq::Error::ETERM => Self::Closed,
            source => Self::ReceiveFailed { source },
        }
    }

    /// Maps a poll failure, folding context termination into [`TransportError::Closed`].
    pub(crate) fn poll(source: zmq::Error) -> Self {
        match source {
            zmq::Error::ETERM => Self::Closed,
            source => Self::PollFailed { source },
        }
    }

    /// Shorthand for [`TransportError::InvalidConfiguration`].
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Returns `true` if retrying the failed operation on a fresh socket may succeed.
    ///
    /// Non-recoverable errors include invalid configuration, bind failures and
    /// a terminated context.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ixmq::transport::TransportError;
    ///
    /// let error = TransportError::ReceiveFailed {
    ///     source: zmq::Error::EINTR,
    /// };
    /// assert!(error.is_recoverable());
    /// assert!(!TransportError::Closed.is_recoverable());
    /// ```
    pub fn is_recoverable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed { .. } => true,

            TransportError::SendFailed { source }
            | TransportError::ReceiveFailed { source }
            | TransportError::PollFailed { source } => !matches!(
                source,
                zmq::Error::ENOTSOCK | zmq::Error::EFAULT | zmq::Error::ENOTSUP
            ),

            TransportError::SocketFailed { source, .. } => {
                matches!(source, zmq::Error::EMFILE | zmq::Error::ENOMEM)
            }

            TransportError::InvalidConfiguration { .. }
            | TransportError::Closed
            | TransportError::BindFailed { .. } => false,
        }
    }

    /// Returns `true` if the socket that produced this error must be discarded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ixmq::transport::TransportError;
    ///
    /// assert!(TransportError::Closed.should_close_transport());
    /// ```
    pub fn should_close_transport(&self) -> bool {
        match self {
            TransportError::Closed
            | TransportError::InvalidConfiguration { .. }
            | TransportError::SendFailed { .. }
            | TransportError::ReceiveFailed { .. } => true,

            // Interrupted polls leave the socket usable
            TransportError::PollFailed { source } => !matches!(source, zmq::Error::EINTR),

            // Nothing was established yet
            TransportError::SocketFailed { .. }
            | TransportError::ConnectionFailed { .. }
            | TransportError::BindFailed { .. } => false,
        }
    }
}
