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

//! Message codec error types.

use thiserror::Error;

/// Errors produced while parsing a received blob.
///
/// Decode failures are always returned to the layer that attempted the
/// parse. The server turns them into FAIL replies; the client surfaces them
/// to its caller.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The blob is not well-formed JSON, or a field has the wrong shape.
    #[error("malformed blob: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required field is missing.
    #[error("field absent: {field}")]
    FieldAbsent {
        /// Name of the missing field
        field: &'static str,
    },

    /// The reply status is neither `"OK"` nor `"fail"`.
    #[error("invalid status: {value:?}")]
    InvalidStatus {
        /// The status text that was received
        value: String,
    },

    /// A FAIL reply arrived with an empty message.
    #[error("inconsistent status/message: fail reply without a message")]
    InconsistentStatus,

    /// A broadcast blob contains no `{`, so no reply payload could be found.
    #[error("broadcast blob has no payload")]
    MissingPayload,

    /// The received frames are not valid UTF-8 text.
    #[error("blob is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors produced while encoding a message for sending.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A FAIL reply has an empty message and must not leave the process.
    #[error("invalid reply: fail status requires a non-empty message")]
    InvalidReply,

    /// A float parameter is NaN or infinite, which JSON cannot carry.
    #[error("non-finite number in parameter {key}")]
    NonFiniteNumber {
        /// Path to the offending value, e.g. `prices[2]` or `stats.mean`
        key: String,
    },

    /// The JSON encoder rejected the value.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
