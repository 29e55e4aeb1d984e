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

//! Top-level error type for ixmq.
//!
//! Each layer has its own error enum:
//!
//! - [`TransportError`]: socket creation, bind, connect, send, receive
//! - [`DecodeError`] / [`EncodeError`]: message codec failures
//! - [`ClientError`], [`ServerError`], [`RoutingError`], [`BroadcastError`]:
//!   component level failures
//!
//! [`IxmqError`] composes them so a supervising process can hold any of
//! them and decide what to do with the classification helpers.
//!
//! # Handling strategy
//!
//! - **Bad requests** are answered with FAIL replies and never reach here
//! - **Transport faults** while serving are fatal to the loop; the owner
//!   rebuilds the component (see [`Supervisor`](crate::supervisor::Supervisor))
//! - **Setup errors** (bad endpoint, duplicate handler or route) are not
//!   recoverable and should stop the process
//!
//! # Examples
//!
//! ```rust
//! use ixmq::IxmqError;
//! use ixmq::server::ServerError;
//! use ixmq::transport::TransportError;
//!
//! let error: IxmqError = ServerError::Transport(TransportError::Closed).into();
//! assert!(error.is_fatal());
//! assert!(error.is_transport_error());
//! assert!(matches!(error.transport_error(), Some(TransportError::Closed)));
//! ```

use crate::broadcast::BroadcastError;
use crate::broker::RoutingError;
use crate::client::ClientError;
use crate::message::{DecodeError, EncodeError};
use crate::server::ServerError;
use crate::transport::TransportError;
use std::error::Error as StdError;
use std::fmt;

/// Any error produced by ixmq.
#[derive(Debug)]
pub enum IxmqError {
    /// Socket level failure.
    Transport(TransportError),

    /// A received blob could not be parsed.
    Decode(DecodeError),

    /// A message could not be encoded.
    Encode(EncodeError),

    /// Reliable client failure.
    Client(ClientError),

    /// Command dispatch server failure.
    Server(ServerError),

    /// Broker configuration or forwarding failure.
    Routing(RoutingError),

    /// Broadcaster failure.
    Broadcast(BroadcastError),
}

impl IxmqError {
    /// Returns `true` if a transport failure is at the root of this error.
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        self.transport_error().is_some()
    }

    /// Returns the underlying transport error, if there is one.
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e)
            | Self::Client(ClientError::Transport(e))
            | Self::Client(ClientError::Connection { source: e, .. })
            | Self::Server(ServerError::Transport(e))
            | Self::Server(ServerError::Bind { source: e, .. })
            | Self::Routing(RoutingError::Transport(e))
            | Self::Broadcast(BroadcastError::Transport(e)) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` if this error ended a serve loop.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Transport(e) => e.should_close_transport(),
            Self::Server(e) => e.is_fatal(),
            Self::Routing(e) => e.is_fatal(),
            Self::Broadcast(e) => e.is_fatal(),
            Self::Decode(_) | Self::Encode(_) | Self::Client(_) => false,
        }
    }

    /// Returns `true` if retrying or rebuilding the failed component may
    /// succeed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_recoverable(),
            Self::Client(e) => e.is_recoverable(),
            Self::Server(e) => e.is_recoverable(),
            Self::Routing(e) => e.is_recoverable(),
            Self::Broadcast(e) => e.is_fatal(),
            Self::Decode(_) | Self::Encode(_) => false,
        }
    }
}

impl fmt::Display for IxmqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Decode(e) => write!(f, "decode error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
            Self::Client(e) => write!(f, "client error: {e}"),
            Self::Server(e) => write!(f, "server error: {e}"),
            Self::Routing(e) => write!(f, "routing error: {e}"),
            Self::Broadcast(e) => write!(f, "broadcast error: {e}"),
        }
    }
}

impl StdError for IxmqError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Client(e) => Some(e),
            Self::Server(e) => Some(e),
            Self::Routing(e) => Some(e),
            Self::Broadcast(e) => Some(e),
        }
    }
}

impl From<TransportError> for IxmqError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

impl From<DecodeError> for IxmqError {
    fn from(error: DecodeError) -> Self {
        Self::Decode(error)
    }
}

impl From<EncodeError> for IxmqError {
    fn from(error: EncodeError) -> Self {
        Self::Encode(error)
    }
}

impl From<ClientError> for IxmqError {
    fn from(error: ClientError) -> Self {
        Self::Client(error)
    }
}

impl From<ServerError> for IxmqError {
    fn from(error: ServerError) -> Self {
        Self::Server(error)
    }
}

impl From<RoutingError> for IxmqError {
    fn from(error: RoutingError) -> Self {
        Self::Routing(error)
    }
}

impl From<BroadcastError> for IxmqError {
    fn from(error: BroadcastError) -> Self {
        Self::Broadcast(error)
    }
}
