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

//! Supervisor error types.

use crate::IxmqError;
use thiserror::Error;

/// Why a [`Supervisor`](crate::supervisor::Supervisor) stopped.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The strategy declined another restart, or the error was permanent.
    #[error("{name} gave up after {runs} runs: {last_error}")]
    GaveUp {
        /// Supervised component
        name: String,
        /// Runs started, including the first
        runs: u32,
        /// Error that ended the last run
        #[source]
        last_error: IxmqError,
    },

    /// The supervised closure panicked.
    #[error("{name} panicked: {message}")]
    Panicked {
        /// Supervised component
        name: String,
        /// Panic description
        message: String,
    },
}

impl SupervisorError {
    /// The error that ended the last run, when it was an error.
    pub fn last_error(&self) -> Option<&IxmqError> {
        match self {
            Self::GaveUp { last_error, .. } => Some(last_error),
            Self::Panicked { .. } => None,
        }
    }
}
