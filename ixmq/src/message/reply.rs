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

//! Command replies.

use crate::message::{DecodeError, EncodeError, Parameters, concat_frames};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The command succeeded.
    #[serde(rename = "OK")]
    Ok,
    /// The command failed; the reply message says why.
    #[serde(rename = "fail")]
    Fail,
}

impl Status {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "fail",
        }
    }

    fn parse(value: String) -> Result<Self, DecodeError> {
        match value.as_str() {
            "OK" => Ok(Self::Ok),
            "fail" => Ok(Self::Fail),
            _ => Err(DecodeError::InvalidStatus { value }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The answer to a [`Request`](crate::message::Request).
///
/// A FAIL reply must carry a non-empty message. Replies that break this rule
/// can be constructed but are rejected by [`encode`](Self::encode).
///
/// # Examples
///
/// ```rust
/// use ixmq::message::{Parameters, Reply, Status};
///
/// let ok = Reply::ok(Parameters::new().with("counter", 3));
/// assert_eq!(ok.status, Status::Ok);
///
/// let fail = Reply::fail("block not found");
/// assert!(fail.encode().is_ok());
///
/// let invalid = Reply::fail("");
/// assert!(invalid.encode().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    /// Outcome
    pub status: Status,
    /// Human readable detail; required for FAIL
    pub message: String,
    /// Result values
    pub parameters: Parameters,
}

#[derive(Deserialize)]
struct RawReply {
    status: Option<String>,
    message: Option<String>,
    parameters: Option<Parameters>,
}

impl Reply {
    /// A successful reply with an empty message.
    pub fn ok(parameters: Parameters) -> Self {
        Self {
            status: Status::Ok,
            message: String::new(),
            parameters,
        }
    }

    /// A failed reply with no parameters.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: message.into(),
            parameters: Parameters::new(),
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns `true` for an OK reply.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Checks the status/message invariant and that every float parameter
    /// is finite.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.status == Status::Fail && self.message.is_empty() {
            return Err(EncodeError::InvalidReply);
        }
        self.parameters.ensure_finite()
    }

    /// Encodes the reply as a JSON blob, rejecting invalid replies.
    pub fn encode(&self) -> Result<String, EncodeError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a reply blob.
    pub fn decode(blob: &str) -> Result<Self, DecodeError> {
        let raw: RawReply = serde_json::from_str(blob)?;
        let status = Status::parse(raw.status.ok_or(DecodeError::FieldAbsent { field: "status" })?)?;
        let message = raw.message.ok_or(DecodeError::FieldAbsent { field: "message" })?;
        let parameters = raw
            .parameters
            .ok_or(DecodeError::FieldAbsent { field: "parameters" })?;

        if status == Status::Fail && message.is_empty() {
            return Err(DecodeError::InconsistentStatus);
        }

        Ok(Self {
            status,
            message,
            parameters,
        })
    }

    /// Parses a reply that may have been split across several frames.
    pub fn from_frames<F: AsRef<[u8]>>(frames: &[F]) -> Result<Self, DecodeError> {
        Self::decode(&concat_frames(frames)?)
    }
}
