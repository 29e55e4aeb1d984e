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

//! Command dispatch servers.
//!
//! A [`Server`] binds one socket, decodes each incoming [`Request`], and
//! calls the handler registered for its command in a [`HandlerTable`].
//! Reply servers ([`ServerKind::Reply`]) send the handler's [`Reply`] back;
//! pull servers ([`ServerKind::Pull`]) only log failures.
//!
//! Handlers are plain closures over a caller-chosen context type:
//!
//! ```rust
//! use ixmq::message::{Parameters, Reply, Request};
//! use ixmq::server::HandlerTable;
//! use tracing::Span;
//!
//! struct Chain {
//!     height: i64,
//! }
//!
//! let handlers = HandlerTable::<Chain>::new()
//!     .with("height", |_request: Request, span: &Span, chain: &Chain| {
//!         span.in_scope(|| tracing::debug!(height = chain.height, "height requested"));
//!         Reply::ok(Parameters::new().with("height", chain.height))
//!     })
//!     .unwrap();
//! assert_eq!(handlers.len(), 1);
//! ```
//!
//! [`Request`]: crate::message::Request
//! [`Reply`]: crate::message::Reply

mod error;
mod handler;
mod server;

pub use error::ServerError;
pub use handler::{CommandHandler, HandlerTable};
pub use server::{Server, ServerKind};
