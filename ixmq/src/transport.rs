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

//! Transport layer for ixmq.
//!
//! Every component in this crate talks over libzmq sockets created from a
//! shared [`Context`]. This module owns the pieces they have in common:
//!
//! - [`Endpoint`]: an address plus how it is attached ([`EndpointKind`]) and
//!   optional CURVE [`Credentials`]
//! - [`Context`]: the socket factory, cheap to clone and passed explicitly
//! - [`TransportError`]: structured socket failures with recovery hints
//! - [`ShutdownHandle`]: cooperative stop signal for serve loops
//!
//! # Endpoints
//!
//! ```rust
//! use ixmq::transport::{Endpoint, EndpointKind};
//!
//! let server = Endpoint::bind_local("tcp://*:5555");
//! let client = Endpoint::connect_remote("tcp://localhost:5555");
//! let local = Endpoint::in_process("workers");
//!
//! assert_eq!(server.kind(), EndpointKind::BindLocal);
//! assert_eq!(client.kind(), EndpointKind::ConnectRemote);
//! assert_eq!(local.address(), "inproc://workers");
//! ```
//!
//! In-process endpoints only reach sockets created from the same
//! [`Context`]; a server and its clients must share one to use them.

mod config;
pub(crate) mod context;
mod error;
pub(crate) mod frames;
mod shutdown;

pub use config::{Credentials, Endpoint, EndpointKind};
pub use context::{Context, Pattern};
pub use error::TransportError;
pub use shutdown::ShutdownHandle;

pub(crate) use shutdown::SERVE_TICK;
