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

//! Broker error types.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors from configuring or running a [`Broker`](crate::broker::Broker).
///
/// Registration errors are returned at setup. `UnknownRoute` and
/// `MalformedEnvelope` describe rejected client messages; they are answered
/// or logged and never stop the broker.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The destination is already registered.
    #[error("destination already registered: {destination}")]
    DuplicateDestination {
        /// Destination address
        destination: String,
    },

    /// The command already routes to a destination.
    #[error("command {command} already routes to {destination}")]
    DuplicateCommand {
        /// Command name
        command: String,
        /// Address the command already routes to
        destination: String,
    },

    /// A destination was registered without any commands.
    #[error("no commands given for destination {destination}")]
    NoCommands {
        /// Destination address
        destination: String,
    },

    /// A command name is empty or blank.
    #[error("invalid command name: {command:?}")]
    InvalidCommand {
        /// The rejected name
        command: String,
    },

    /// No destination is registered for the label.
    #[error("no destination registered for {label}")]
    UnknownRoute {
        /// Routing label from the client message
        label: String,
    },

    /// A client message is too short to be routed.
    #[error("malformed envelope: {frames} frames, at least 4 required")]
    MalformedEnvelope {
        /// Frames received
        frames: usize,
    },

    /// A socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl RoutingError {
    /// Returns `true` if this error stops a running broker.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if restarting the broker may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(e) => !matches!(e, TransportError::InvalidConfiguration { .. }),
            Self::UnknownRoute { .. } | Self::MalformedEnvelope { .. } => true,
            Self::DuplicateDestination { .. }
            | Self::DuplicateCommand { .. }
            | Self::NoCommands { .. }
            | Self::InvalidCommand { .. } => false,
        }
    }
}
