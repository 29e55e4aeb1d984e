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

//! Wire message model.
//!
//! Three value types travel between services:
//!
//! - [`Request`]: a command name plus a [`Parameters`] bag
//! - [`Reply`]: a [`Status`], a message and result parameters
//! - [`Broadcast`]: a [`Reply`] published under a topic
//!
//! Each encodes to a single compact JSON text blob. The transport may split a
//! blob across several frames, so decoding always concatenates the frames
//! first (`from_frames`) and then parses the text.
//!
//! # Examples
//!
//! ```rust
//! use ixmq::message::{Parameters, Reply, Request};
//!
//! let request = Request::new("echo").with_parameter("counter", 3);
//! let decoded = Request::decode(&request.encode().unwrap()).unwrap();
//! assert_eq!(decoded.parameters.get_i64("counter"), Some(3));
//!
//! let reply = Reply::ok(decoded.parameters);
//! let decoded = Reply::decode(&reply.encode().unwrap()).unwrap();
//! assert_eq!(decoded, reply);
//! ```

mod broadcast;
mod error;
mod reply;
mod request;
mod value;

pub use broadcast::Broadcast;
pub use error::{DecodeError, EncodeError};
pub use reply::{Reply, Status};
pub use request::Request;
pub use value::{Parameters, Value};

/// Joins frames into one UTF-8 string.
pub(crate) fn concat_frames<F: AsRef<[u8]>>(frames: &[F]) -> Result<String, DecodeError> {
    let bytes: Vec<u8> = frames
        .iter()
        .flat_map(|frame| frame.as_ref().iter().copied())
        .collect();
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}
