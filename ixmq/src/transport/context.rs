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

//! Socket construction.
//!
//! Every socket in the crate is created through [`open`], which applies the
//! same sequence for all components: create from the injected [`Context`],
//! set linger, attach CURVE credentials, then bind or connect.

use crate::transport::{Credentials, Endpoint, EndpointKind, TransportError};
use std::fmt;
use std::time::Duration;

/// Linger applied to request sockets that are routinely discarded.
pub(crate) const DISCARD_LINGER: Duration = Duration::ZERO;

/// Linger applied to long-lived serving sockets.
pub(crate) const SERVICE_LINGER: Duration = Duration::from_secs(1);

/// Shared libzmq context.
///
/// Sockets are always created from an explicitly passed context; there is no
/// process-wide instance. `inproc://` endpoints only reach peers created from
/// the same context, so in-process services and their clients must share one.
///
/// # Examples
///
/// ```rust
/// use ixmq::transport::Context;
///
/// let context = Context::new();
/// let shared = context.clone();
/// # drop(shared);
/// ```
#[derive(Clone)]
pub struct Context {
    inner: zmq::Context,
}

impl Context {
    /// Creates a new libzmq context.
    pub fn new() -> Self {
        Self {
            inner: zmq::Context::new(),
        }
    }

    /// Returns `true` if the linked libzmq supports CURVE authentication.
    pub fn curve_available() -> bool {
        zmq::has("curve").unwrap_or(false)
    }

    pub(crate) fn socket(&self, pattern: Pattern) -> Result<zmq::Socket, TransportError> {
        self.inner
            .socket(pattern.socket_type())
            .map_err(|source| TransportError::SocketFailed {
                pattern: pattern.as_str(),
                source,
            })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

/// Socket messaging pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Strict request side of request/reply
    Req,
    /// Strict reply side of request/reply
    Rep,
    /// Fire-and-forget producer
    Push,
    /// Fire-and-forget consumer
    Pull,
    /// Identity-addressed frontend
    Router,
    /// Asynchronous backend connection
    Dealer,
    /// Broadcast publisher
    Pub,
    /// Broadcast subscriber
    Sub,
}

impl Pattern {
    /// Returns the libzmq name of this pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Req => "REQ",
            Self::Rep => "REP",
            Self::Push => "PUSH",
            Self::Pull => "PULL",
            Self::Router => "ROUTER",
            Self::Dealer => "DEALER",
            Self::Pub => "PUB",
            Self::Sub => "SUB",
        }
    }

    fn socket_type(&self) -> zmq::SocketType {
        match self {
            Self::Req => zmq::REQ,
            Self::Rep => zmq::REP,
            Self::Push => zmq::PUSH,
            Self::Pull => zmq::PULL,
            Self::Router => zmq::ROUTER,
            Self::Dealer => zmq::DEALER,
            Self::Pub => zmq::PUB,
            Self::Sub => zmq::SUB,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the address a socket takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attach {
    Bind,
    Connect,
}

/// Creates a socket for `endpoint` and attaches it.
pub(crate) fn open(
    context: &Context,
    endpoint: &Endpoint,
    pattern: Pattern,
    attach: Attach,
    linger: Duration,
) -> Result<zmq::Socket, TransportError> {
    let socket = context.socket(pattern)?;
    let linger_ms = i32::try_from(linger.as_millis()).unwrap_or(i32::MAX);
    socket
        .set_linger(linger_ms)
        .map_err(|e| option_failed("linger", e))?;
    apply_credentials(&socket, endpoint, attach)?;

    let address = endpoint.address();
    match attach {
        Attach::Bind => socket
            .bind(address)
            .map_err(|source| TransportError::BindFailed {
                address: address.to_string(),
                source,
            })?,
        Attach::Connect => {
            socket
                .connect(address)
                .map_err(|source| TransportError::ConnectionFailed {
                    address: address.to_string(),
                    source,
                })?
        }
    }

    tracing::trace!(%pattern, %endpoint, ?attach, "socket attached");
    Ok(socket)
}

fn apply_credentials(
    socket: &zmq::Socket,
    endpoint: &Endpoint,
    attach: Attach,
) -> Result<(), TransportError> {
    let Some(credentials) = endpoint.credentials() else {
        return Ok(());
    };
    if endpoint.kind() == EndpointKind::InProcess {
        return Err(TransportError::invalid_configuration(format!(
            "in-process endpoint {} cannot carry credentials",
            endpoint.address()
        )));
    }
    if !Context::curve_available() {
        return Err(TransportError::invalid_configuration(
            "libzmq was built without CURVE support",
        ));
    }

    match (credentials, attach) {
        (
            Credentials::Server {
                secret_key,
                zap_domain,
            },
            Attach::Bind,
        ) => {
            socket
                .set_curve_server(true)
                .map_err(|e| option_failed("curve_server", e))?;
            socket
                .set_curve_secretkey(secret_key.as_bytes())
                .map_err(|e| option_failed("curve_secretkey", e))?;
            if let Some(domain) = zap_domain {
                socket
                    .set_zap_domain(domain)
                    .map_err(|e| option_failed("zap_domain", e))?;
            }
            Ok(())
        }
        (
            Credentials::Client {
                server_public_key,
                public_key,
                secret_key,
            },
            Attach::Connect,
        ) => {
            socket
                .set_curve_serverkey(server_public_key.as_bytes())
                .map_err(|e| option_failed("curve_serverkey", e))?;
            socket
                .set_curve_publickey(public_key.as_bytes())
                .map_err(|e| option_failed("curve_publickey", e))?;
            socket
                .set_curve_secretkey(secret_key.as_bytes())
                .map_err(|e| option_failed("curve_secretkey", e))?;
            Ok(())
        }
        (Credentials::Server { .. }, Attach::Connect) => Err(
            TransportError::invalid_configuration(format!(
                "server credentials given to connecting endpoint {}",
                endpoint.address()
            )),
        ),
        (Credentials::Client { .. }, Attach::Bind) => Err(TransportError::invalid_configuration(
            format!(
                "client credentials given to binding endpoint {}",
                endpoint.address()
            ),
        )),
    }
}

fn option_failed(option: &str, error: zmq::Error) -> TransportError {
    TransportError::invalid_configuration(format!("cannot set socket option {option}: {error}"))
}
