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

//! Client side of request-reply and publish-subscribe.
//!
//! - [`Client`]: sends requests with bounded retry and reconnect on timeout
//! - [`Pusher`]: fire-and-forget requests to pull servers
//! - [`Subscriber`]: receives broadcasts for a set of topics
//! - [`ClientConfig`]: request timeout and retry count
//!
//! # Retry semantics
//!
//! A request is sent, then the client waits `timeout` for a reply. When no
//! reply comes the socket is recreated and the request is resent, up to
//! `attempts` more times:
//!
//! ```text
//! send ─ poll(timeout) ─┬─ reply OK    → Ok(parameters)
//!                       ├─ reply FAIL  → Err(RemoteFailure)   (no retry)
//!                       └─ timeout     → reconnect ─┬─ retries left → send
//!                                                   └─ none         → Err(Timeout)
//! ```

mod client;
mod config;
mod error;
mod pusher;
mod subscriber;

pub use client::{Client, Routing};
pub use config::{ATTEMPTS_ENV, ClientConfig, TIMEOUT_ENV};
pub use error::ClientError;
pub use pusher::Pusher;
pub use subscriber::Subscriber;
