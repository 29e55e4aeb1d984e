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

//! Endpoint descriptors.
//!
//! An [`Endpoint`] is the ready-made description of where a socket attaches:
//! a full libzmq address (`tcp://host:port`, `ipc://path`, `inproc://name`),
//! how the socket attaches to it, and optional CURVE key material. Address
//! resolution and key provisioning belong to the configuration layer of each
//! service; this crate only consumes the result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a socket attaches to its address.
///
/// # Examples
///
/// ```rust
/// use ixmq::transport::EndpointKind;
///
/// assert!(EndpointKind::BindLocal.binds());
/// assert!(!EndpointKind::ConnectRemote.binds());
/// assert_eq!(EndpointKind::InProcess.as_str(), "in_process");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Bind a local address and accept peers (servers, brokers).
    BindLocal,

    /// Connect to a remote address (clients, broker backends).
    ConnectRemote,

    /// Connect to a remote publisher and receive broadcasts.
    Subscribe,

    /// Bind a local address and publish broadcasts.
    Publish,

    /// Same-process `inproc://` address; the binding side binds and the
    /// other side connects. Never authenticated.
    InProcess,
}

impl EndpointKind {
    /// Returns the configuration name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BindLocal => "bind_local",
            Self::ConnectRemote => "connect_remote",
            Self::Subscribe => "subscribe",
            Self::Publish => "publish",
            Self::InProcess => "in_process",
        }
    }

    /// Returns `true` if sockets of this kind always bind their address.
    pub fn binds(&self) -> bool {
        matches!(self, Self::BindLocal | Self::Publish)
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CURVE key material, Z85 encoded (40 characters per key).
///
/// `Debug` output never includes secret keys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Credentials {
    /// Keys for the binding side of an authenticated endpoint.
    Server {
        /// The server's long-term secret key
        secret_key: String,
        /// ZAP domain announced to the authentication handler
        #[serde(default, skip_serializing_if = "Option::is_none")]
        zap_domain: Option<String>,
    },

    /// Keys for the connecting side of an authenticated endpoint.
    Client {
        /// Public key of the server being connected to
        server_public_key: String,
        /// The client's public key
        public_key: String,
        /// The client's secret key
        secret_key: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server { zap_domain, .. } => f
                .debug_struct("Server")
                .field("secret_key", &"<redacted>")
                .field("zap_domain", zap_domain)
                .finish(),
            Self::Client {
                server_public_key,
                public_key,
                ..
            } => f
                .debug_struct("Client")
                .field("server_public_key", server_public_key)
                .field("public_key", public_key)
                .field("secret_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Where and how a socket attaches.
///
/// # Examples
///
/// ```rust
/// use ixmq::transport::{Endpoint, EndpointKind};
///
/// let endpoint = Endpoint::connect_remote("tcp://127.0.0.1:4000");
/// assert_eq!(endpoint.kind(), EndpointKind::ConnectRemote);
/// assert_eq!(endpoint.address(), "tcp://127.0.0.1:4000");
/// assert!(endpoint.credentials().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    address: String,
    kind: EndpointKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    credentials: Option<Credentials>,
}

impl Endpoint {
    /// Creates an endpoint descriptor without credentials.
    pub fn new(kind: EndpointKind, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            kind,
            credentials: None,
        }
    }

    /// A locally bound endpoint.
    pub fn bind_local(address: impl Into<String>) -> Self {
        Self::new(EndpointKind::BindLocal, address)
    }

    /// A remote endpoint to connect to.
    pub fn connect_remote(address: impl Into<String>) -> Self {
        Self::new(EndpointKind::ConnectRemote, address)
    }

    /// A remote publisher to subscribe to.
    pub fn subscribe(address: impl Into<String>) -> Self {
        Self::new(EndpointKind::Subscribe, address)
    }

    /// A locally bound publisher.
    pub fn publish(address: impl Into<String>) -> Self {
        Self::new(EndpointKind::Publish, address)
    }

    /// An in-process endpoint. A bare name is expanded to `inproc://name`.
    ///
    /// ```rust
    /// use ixmq::transport::Endpoint;
    ///
    /// assert_eq!(Endpoint::in_process("categorizer").address(), "inproc://categorizer");
    /// assert_eq!(Endpoint::in_process("inproc://db").address(), "inproc://db");
    /// ```
    pub fn in_process(name: impl Into<String>) -> Self {
        let name = name.into();
        let address = if name.starts_with("inproc://") {
            name
        } else {
            format!("inproc://{name}")
        };
        Self::new(EndpointKind::InProcess, address)
    }

    /// Attaches CURVE credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Returns the libzmq address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the endpoint kind.
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Returns the credentials, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Checks that this endpoint is one of the `accepted` kinds.
    pub(crate) fn expect_kind(
        &self,
        component: &str,
        accepted: &[EndpointKind],
    ) -> Result<(), crate::transport::TransportError> {
        if accepted.contains(&self.kind) {
            return Ok(());
        }
        Err(crate::transport::TransportError::invalid_configuration(
            format!(
                "{component} cannot use a {} endpoint ({})",
                self.kind, self.address
            ),
        ))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(Endpoint::bind_local("tcp://*:1").kind(), EndpointKind::BindLocal);
        assert_eq!(
            Endpoint::connect_remote("tcp://a:1").kind(),
            EndpointKind::ConnectRemote
        );
        assert_eq!(Endpoint::subscribe("tcp://a:2").kind(), EndpointKind::Subscribe);
        assert_eq!(Endpoint::publish("tcp://*:2").kind(), EndpointKind::Publish);
        assert_eq!(Endpoint::in_process("x").kind(), EndpointKind::InProcess);
    }

    #[test]
    fn test_expect_kind_rejects_other_kinds() {
        let endpoint = Endpoint::subscribe("tcp://127.0.0.1:5000");
        let error = endpoint
            .expect_kind("server", &[EndpointKind::BindLocal, EndpointKind::InProcess])
            .unwrap_err();
        assert!(error.to_string().contains("subscribe"));
        assert!(error.to_string().contains("server"));
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials = Credentials::Client {
            server_public_key: "server-public".to_string(),
            public_key: "client-public".to_string(),
            secret_key: "very-secret".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("client-public"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_endpoint_deserializes_from_config() {
        let json = r#"{
            "address": "tcp://127.0.0.1:4100",
            "kind": "connect_remote",
            "credentials": {
                "role": "client",
                "server_public_key": "spk",
                "public_key": "pk",
                "secret_key": "sk"
            }
        }"#;
        let endpoint: Endpoint = serde_json::from_str(json).unwrap();
        assert_eq!(endpoint.kind(), EndpointKind::ConnectRemote);
        assert!(matches!(
            endpoint.credentials(),
            Some(Credentials::Client { public_key, .. }) if public_key == "pk"
        ));
    }

    #[test]
    fn test_endpoint_without_credentials_omits_field() {
        let json = serde_json::to_string(&Endpoint::in_process("db")).unwrap();
        assert!(!json.contains("credentials"));
        assert!(json.contains("in_process"));
    }
}
