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

//! Exponential backoff restart strategy.

use crate::IxmqError;
use crate::supervisor::traits::{RestartMetrics, RestartStrategy, is_permanent};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::time::Duration;

/// Restarts a failed serve loop after a delay that grows with each
/// consecutive failure.
///
/// Restart `n` (counting from zero) waits `first_delay * factor^n`, never
/// more than `ceiling`. With jitter the wait is drawn from the upper half of
/// that window, so supervisors of several services that crashed together do
/// not rebind in lockstep, and no restart ever fires without a pause.
///
/// # Examples
///
/// ```
/// use ixmq::supervisor::ExponentialBackoff;
/// use std::time::Duration;
///
/// // A broker that should come back quickly but stop after ten crashes.
/// let strategy = ExponentialBackoff::builder()
///     .first_delay(Duration::from_millis(250))
///     .ceiling(Duration::from_secs(15))
///     .factor(3.0)
///     .give_up_after(10)
///     .build();
/// assert_eq!(strategy.restart_limit(), Some(10));
/// ```
#[derive(Debug)]
pub struct ExponentialBackoff {
    first_delay: Duration,
    ceiling: Duration,
    factor: f64,
    jitter: bool,
    restart_limit: Option<u32>,
    history: Mutex<RestartMetrics>,
}

impl Default for ExponentialBackoff {
    /// 100 ms doubling up to one minute, jittered, restarting forever.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExponentialBackoff {
    /// Starts from the default policy.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Restarts allowed before giving up, `None` for no limit.
    pub fn restart_limit(&self) -> Option<u32> {
        self.restart_limit
    }

    /// Failures seen since the last [`reset`](RestartStrategy::reset).
    pub fn metrics(&self) -> RestartMetrics {
        self.history.lock().clone()
    }

    /// The un-jittered wait before restart number `restart`.
    fn window(&self, restart: u32) -> Duration {
        let exponent = i32::try_from(restart).unwrap_or(i32::MAX);
        let nanos = self.first_delay.as_nanos() as f64 * self.factor.powi(exponent);
        if nanos.is_finite() && nanos < self.ceiling.as_nanos() as f64 {
            Duration::from_nanos(nanos as u64)
        } else {
            self.ceiling
        }
    }
}

#[async_trait]
impl RestartStrategy for ExponentialBackoff {
    async fn should_restart(&self, attempt: u32, last_error: &IxmqError) -> bool {
        !is_permanent(last_error) && self.restart_limit.is_none_or(|limit| attempt < limit)
    }

    async fn next_delay(&self, attempt: u32) -> Duration {
        let window = self.window(attempt);
        if !self.jitter || window.is_zero() {
            return window;
        }
        let half = window / 2;
        half + (window - half).mul_f64(rand::rng().random::<f64>())
    }

    fn on_failure(&self, error: &IxmqError) {
        self.history.lock().record_failure(error);
    }

    fn reset(&self) {
        self.history.lock().reset();
    }

    fn name(&self) -> &str {
        "ExponentialBackoff"
    }
}

/// Builder for [`ExponentialBackoff`].
#[derive(Debug, Clone)]
pub struct ExponentialBackoffBuilder {
    first_delay: Duration,
    ceiling: Duration,
    factor: f64,
    jitter: bool,
    restart_limit: Option<u32>,
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self {
            first_delay: Duration::from_millis(100),
            ceiling: Duration::from_secs(60),
            factor: 2.0,
            jitter: true,
            restart_limit: None,
        }
    }
}

impl ExponentialBackoffBuilder {
    /// Wait before the first restart.
    pub fn first_delay(mut self, delay: Duration) -> Self {
        self.first_delay = delay;
        self
    }

    /// Longest wait between restarts.
    pub fn ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Growth per consecutive failure. Values below 1.0, and NaN, are
    /// treated as 1.0.
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor.max(1.0);
        self
    }

    /// Draw each wait from the upper half of its window.
    pub fn jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Stop after `restarts` restarts; the run after the last one is final.
    pub fn give_up_after(mut self, restarts: u32) -> Self {
        self.restart_limit = Some(restarts);
        self
    }

    /// Remove any restart limit.
    pub fn restart_forever(mut self) -> Self {
        self.restart_limit = None;
        self
    }

    /// Builds the strategy. The first delay is clamped to the ceiling.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            first_delay: self.first_delay.min(self.ceiling),
            ceiling: self.ceiling,
            factor: self.factor,
            jitter: self.jitter,
            restart_limit: self.restart_limit,
            history: Mutex::new(RestartMetrics::new()),
        }
    }
}
