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

//! Client error types.

use crate::message::{DecodeError, EncodeError};
use crate::transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`Client`](crate::client::Client) and
/// [`Subscriber`](crate::client::Subscriber).
///
/// Callers always get either the reply parameters or exactly one of these.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The socket could not be created or attached at construction.
    #[error("failed to connect to {endpoint}: {source}")]
    Connection {
        /// Endpoint address
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// The client configuration is unusable.
    #[error("invalid client configuration: {reason}")]
    Configuration {
        /// What is wrong
        reason: String,
    },

    /// No reply arrived after every attempt.
    #[error("no reply after {attempts} attempts of {timeout:?}")]
    Timeout {
        /// Number of sends made
        attempts: u32,
        /// Per-attempt poll timeout
        timeout: Duration,
    },

    /// The remote side answered with a FAIL reply. Never retried.
    #[error("remote failure: {message}")]
    RemoteFailure {
        /// Message carried by the FAIL reply
        message: String,
    },

    /// A socket operation failed while a request was in flight.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply could not be parsed.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The request could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl ClientError {
    /// Returns `true` if retrying the same call later may succeed.
    ///
    /// Timeouts and transient socket failures are recoverable. Remote
    /// failures are answers, not faults, and are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_recoverable(),
            Self::Connection { source, .. } => source.is_recoverable(),
            Self::Configuration { .. }
            | Self::RemoteFailure { .. }
            | Self::Decode(_)
            | Self::Encode(_) => false,
        }
    }

    /// Returns the message of a FAIL reply, if this is a remote failure.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::RemoteFailure { message } => Some(message),
            _ => None,
        }
    }
}
