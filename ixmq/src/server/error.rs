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

//! Server error types.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors from building or running a [`Server`](crate::server::Server).
///
/// Bad requests never surface here; they are answered with FAIL replies.
/// Only setup mistakes and transport faults do.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be created or bound.
    #[error("failed to bind {endpoint}: {source}")]
    Bind {
        /// Endpoint address
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// A handler is already registered under this command name.
    #[error("duplicate handler for command: {command}")]
    DuplicateHandler {
        /// The command name
        command: String,
    },

    /// A handler was registered with an empty command name.
    #[error("handler command name must not be empty")]
    EmptyCommand,

    /// A receive or send failed while serving. The serve loop has stopped
    /// and the server must be rebuilt.
    #[error("transport failure while serving: {0}")]
    Transport(#[from] TransportError),
}

impl ServerError {
    /// Returns `true` if this error ended a running serve loop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if rebuilding the server may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Bind { source, .. } => source.is_recoverable(),
            Self::DuplicateHandler { .. } | Self::EmptyCommand => false,
        }
    }
}
