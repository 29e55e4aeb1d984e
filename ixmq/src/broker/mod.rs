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

//! Command routing broker.
//!
//! A [`Broker`] sits between clients and backend services. It binds a
//! ROUTER frontend, keeps one DEALER connection per registered destination,
//! and forwards each request by the routing label that precedes the
//! request blob. The [`RoutingTable`] guarantees each label reaches exactly
//! one destination.
//!
//! Frontend messages look like this:
//!
//! ```text
//! [client-identity] [""] [label] [request-blob ...]
//! ```
//!
//! The first two frames are the envelope added by the client's REQ socket
//! and the ROUTER. They travel to the backend and back with the reply, which
//! is how the reply finds its client.

mod broker;
mod error;
mod routing;

pub use broker::Broker;
pub use error::RoutingError;
pub use routing::RoutingTable;
