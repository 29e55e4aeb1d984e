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

//! Topic-tagged broadcasts.

use crate::message::{DecodeError, EncodeError, Reply, concat_frames};

/// A reply published under a topic.
///
/// On the wire a broadcast is two frames, `[topic, reply-blob]`. Receivers
/// concatenate the frames and split at the first `{`, so a topic must not
/// contain `{`; such a topic is split inside the topic itself and the
/// payload fails to parse.
///
/// # Examples
///
/// ```rust
/// use ixmq::message::{Broadcast, Parameters, Reply};
///
/// let broadcast = Broadcast::new("blocks", Reply::ok(Parameters::new().with("height", 7)));
/// let [topic, payload] = broadcast.to_frames().unwrap();
/// assert_eq!(topic, b"blocks");
///
/// let decoded = Broadcast::from_frames(&[topic, payload]).unwrap();
/// assert_eq!(decoded, broadcast);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    /// Subscription topic
    pub topic: String,
    /// Published payload
    pub reply: Reply,
}

impl Broadcast {
    /// Creates a broadcast.
    pub fn new(topic: impl Into<String>, reply: Reply) -> Self {
        Self {
            topic: topic.into(),
            reply,
        }
    }

    /// A broadcast is valid when its reply is.
    pub fn validate(&self) -> Result<(), EncodeError> {
        self.reply.validate()
    }

    /// Encodes the broadcast as the topic followed by the reply blob.
    pub fn encode(&self) -> Result<String, EncodeError> {
        let blob = self.reply.encode()?;
        Ok(format!("{}{}", self.topic, blob))
    }

    /// Encodes the broadcast as its two wire frames.
    pub fn to_frames(&self) -> Result<[Vec<u8>; 2], EncodeError> {
        let blob = self.reply.encode()?;
        Ok([self.topic.as_bytes().to_vec(), blob.into_bytes()])
    }

    /// Parses a concatenated broadcast blob.
    pub fn decode(blob: &str) -> Result<Self, DecodeError> {
        let split = blob.find('{').ok_or(DecodeError::MissingPayload)?;
        let (topic, payload) = blob.split_at(split);
        Ok(Self {
            topic: topic.to_string(),
            reply: Reply::decode(payload)?,
        })
    }

    /// Parses a broadcast from its frames.
    pub fn from_frames<F: AsRef<[u8]>>(frames: &[F]) -> Result<Self, DecodeError> {
        Self::decode(&concat_frames(frames)?)
    }
}
