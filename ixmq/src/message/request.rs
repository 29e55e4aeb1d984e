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

//! Command requests.

use crate::message::{DecodeError, EncodeError, Parameters, Value, concat_frames};
use serde::{Deserialize, Serialize};

/// A command invocation: a command name plus a parameter bag.
///
/// `public_key` is filled in by the receiving server from the transport's
/// authentication metadata. It is never serialized, so a sender cannot
/// claim an identity.
///
/// # Examples
///
/// ```rust
/// use ixmq::message::Request;
///
/// let request = Request::new("echo").with_parameter("counter", 3);
/// let blob = request.encode().unwrap();
/// assert_eq!(blob, r#"{"command":"echo","parameters":{"counter":3}}"#);
///
/// let decoded = Request::decode(&blob).unwrap();
/// assert_eq!(decoded, request);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Command name used for dispatch and routing
    pub command: String,
    /// Command arguments
    pub parameters: Parameters,
    /// Authenticated public key of the sender, when authentication is on
    #[serde(skip)]
    pub public_key: Option<String>,
}

#[derive(Deserialize)]
struct RawRequest {
    command: Option<String>,
    parameters: Option<Parameters>,
}

impl Request {
    /// Creates a request with no parameters.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameters: Parameters::new(),
            public_key: None,
        }
    }

    /// Replaces the parameter bag.
    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Adds one parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key, value);
        self
    }

    /// Encodes the request as a JSON blob.
    ///
    /// NaN and infinite floats are refused instead of turning into `null`.
    pub fn encode(&self) -> Result<String, EncodeError> {
        self.parameters.ensure_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a request blob.
    pub fn decode(blob: &str) -> Result<Self, DecodeError> {
        let raw: RawRequest = serde_json::from_str(blob)?;
        Ok(Self {
            command: raw.command.ok_or(DecodeError::FieldAbsent { field: "command" })?,
            parameters: raw
                .parameters
                .ok_or(DecodeError::FieldAbsent { field: "parameters" })?,
            public_key: None,
        })
    }

    /// Parses a request that may have been split across several frames.
    pub fn from_frames<F: AsRef<[u8]>>(frames: &[F]) -> Result<Self, DecodeError> {
        Self::decode(&concat_frames(frames)?)
    }
}
