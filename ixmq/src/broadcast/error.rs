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

//! Broadcast error types.

use crate::message::EncodeError;
use crate::transport::TransportError;
use thiserror::Error;

/// Errors from publishing broadcasts.
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The broadcaster has stopped and no longer accepts broadcasts.
    #[error("broadcaster closed")]
    Closed,

    /// The broadcast's reply is invalid.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The publish socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl BroadcastError {
    /// Returns `true` if this error stopped the broadcaster.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
