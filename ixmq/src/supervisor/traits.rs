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

//! Core restart strategy trait.

use crate::IxmqError;
use async_trait::async_trait;
use std::time::Duration;

/// Decides whether and when a failed serve loop is restarted.
///
/// Implementations are shared behind an `Arc` and may be called from any
/// task, so they keep their bookkeeping behind interior locks.
///
/// # Examples
///
/// ```
/// use ixmq::supervisor::{ExponentialBackoff, RestartStrategy};
/// use std::time::Duration;
///
/// let strategy = ExponentialBackoff::builder()
///     .first_delay(Duration::from_millis(100))
///     .ceiling(Duration::from_secs(30))
///     .build();
/// assert_eq!(strategy.name(), "ExponentialBackoff");
/// ```
#[async_trait]
pub trait RestartStrategy: Send + Sync {
    /// Determine if the component should be started again.
    ///
    /// # Arguments
    ///
    /// * `attempt` - Restarts made so far (0 for the first failure)
    /// * `last_error` - The error that ended the last run
    async fn should_restart(&self, attempt: u32, last_error: &IxmqError) -> bool;

    /// How long to wait before restart number `attempt`.
    async fn next_delay(&self, attempt: u32) -> Duration;

    /// Called every time a run fails.
    fn on_failure(&self, error: &IxmqError);

    /// Clears internal state.
    fn reset(&self);

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// Bookkeeping about restarts, kept by every strategy.
#[derive(Debug, Clone, Default)]
pub struct RestartMetrics {
    /// Runs that ended with an error
    pub failures: u64,
    /// Failures since the last reset
    pub consecutive_failures: u32,
    /// Last error seen
    pub last_error: Option<String>,
}

impl RestartMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed run.
    pub fn record_failure(&mut self, error: &IxmqError) {
        self.failures += 1;
        self.consecutive_failures += 1;
        self.last_error = Some(error.to_string());
    }

    /// Reset all metrics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Errors that must never trigger a restart, whatever the strategy.
pub(crate) fn is_permanent(error: &IxmqError) -> bool {
    !error.is_recoverable()
}
