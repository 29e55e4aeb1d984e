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

//! Multipart frame helpers shared by every component.

use crate::transport::TransportError;
use std::time::Duration;

/// Metadata property set by the ZAP handler to the authenticated peer key.
const USER_ID_PROPERTY: &str = "User-Id";

/// One received multipart message together with its authentication metadata.
#[derive(Debug, Default)]
pub(crate) struct Multipart {
    pub(crate) frames: Vec<Vec<u8>>,
    pub(crate) user_id: Option<String>,
}

/// Receives every frame of one message.
pub(crate) fn recv_frames(socket: &zmq::Socket) -> Result<Vec<Vec<u8>>, TransportError> {
    socket.recv_multipart(0).map_err(TransportError::receive)
}

/// Receives every frame of one message and captures the peer identity
/// attached by the authentication layer, when there is one.
pub(crate) fn recv_with_metadata(socket: &zmq::Socket) -> Result<Multipart, TransportError> {
    let mut multipart = Multipart::default();
    loop {
        let mut message = socket.recv_msg(0).map_err(TransportError::receive)?;
        if multipart.frames.is_empty() {
            multipart.user_id = message
                .gets(USER_ID_PROPERTY)
                .filter(|id| !id.is_empty())
                .map(str::to_owned);
        }
        let more = message.get_more();
        multipart.frames.push(message.to_vec());
        if !more {
            return Ok(multipart);
        }
    }
}

/// Receives frames one at a time, keeping whatever arrived before a failure.
pub(crate) fn recv_partial(socket: &zmq::Socket) -> (Vec<Vec<u8>>, Option<TransportError>) {
    let mut frames = Vec::new();
    loop {
        match socket.recv_bytes(0) {
            Ok(frame) => frames.push(frame),
            Err(e) => return (frames, Some(TransportError::receive(e))),
        }
        match socket.get_rcvmore() {
            Ok(true) => continue,
            Ok(false) => return (frames, None),
            Err(e) => return (frames, Some(TransportError::receive(e))),
        }
    }
}

/// Sends `frames` as one multipart message.
pub(crate) fn send_frames<F: AsRef<[u8]>>(
    socket: &zmq::Socket,
    frames: &[F],
) -> Result<(), TransportError> {
    let last = frames.len().saturating_sub(1);
    for (index, frame) in frames.iter().enumerate() {
        let flags = if index < last { zmq::SNDMORE } else { 0 };
        socket
            .send(frame.as_ref(), flags)
            .map_err(TransportError::send)?;
    }
    Ok(())
}

/// Waits up to `timeout` for `socket` to become readable.
pub(crate) fn poll_readable(socket: &zmq::Socket, timeout: Duration) -> Result<bool, TransportError> {
    let mut items = [socket.as_poll_item(zmq::POLLIN)];
    zmq::poll(&mut items, timeout_millis(timeout)).map_err(TransportError::poll)?;
    Ok(items[0].is_readable())
}

/// Converts a poll timeout to the millisecond count libzmq expects.
pub(crate) fn timeout_millis(timeout: Duration) -> i64 {
    i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX)
}
