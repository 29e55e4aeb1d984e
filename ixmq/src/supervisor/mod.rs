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

//! Explicit restart policy for serve loops.
//!
//! [`Server::serve`](crate::server::Server::serve),
//! [`Broker::serve`](crate::broker::Broker::serve) and
//! [`Broadcaster::run`](crate::broadcast::Broadcaster::run) all return a
//! fatal error on transport faults rather than trying to recover. A
//! [`Supervisor`] turns those errors into restarts according to a
//! [`RestartStrategy`]:
//!
//! - [`ExponentialBackoff`]: growing delays with optional jitter
//! - [`FixedDelay`]: the same delay every time
//! - [`NoRestart`]: report the first failure and stop
//!
//! Errors that cannot be fixed by restarting, such as an invalid endpoint,
//! are never retried regardless of strategy.
//!
//! # Examples
//!
//! ```
//! use ixmq::supervisor::{FixedDelay, RestartStrategy};
//! use std::time::Duration;
//!
//! let strategy = FixedDelay::new(Duration::from_secs(5));
//! assert_eq!(strategy.name(), "FixedDelay");
//! ```

mod error;
mod exponential;
mod fixed;
mod no_restart;
mod supervisor;
mod traits;

pub use error::SupervisorError;
pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fixed::{FixedDelay, FixedDelayBuilder};
pub use no_restart::NoRestart;
pub use supervisor::Supervisor;
pub use traits::{RestartMetrics, RestartStrategy};
