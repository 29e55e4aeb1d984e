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

//! Fixed delay restart strategy.

use crate::IxmqError;
use crate::supervisor::traits::{RestartMetrics, RestartStrategy, is_permanent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// Restart strategy that waits the same delay before every restart.
///
/// # Examples
///
/// ```
/// use ixmq::supervisor::FixedDelay;
/// use std::time::Duration;
///
/// let strategy = FixedDelay::builder()
///     .delay(Duration::from_secs(5))
///     .max_restarts(Some(10))
///     .build();
/// ```
#[derive(Debug)]
pub struct FixedDelay {
    delay: Duration,
    max_restarts: Option<u32>,
    metrics: Mutex<RestartMetrics>,
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FixedDelay {
    /// Create a new builder.
    pub fn builder() -> FixedDelayBuilder {
        FixedDelayBuilder::default()
    }

    /// Restart forever, waiting `delay` each time.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            max_restarts: None,
            metrics: Mutex::new(RestartMetrics::new()),
        }
    }

    /// Get the current metrics.
    pub fn metrics(&self) -> RestartMetrics {
        self.metrics.lock().clone()
    }
}

#[async_trait]
impl RestartStrategy for FixedDelay {
    async fn should_restart(&self, attempt: u32, last_error: &IxmqError) -> bool {
        if is_permanent(last_error) {
            return false;
        }
        self.max_restarts.is_none_or(|max| attempt < max)
    }

    async fn next_delay(&self, _attempt: u32) -> Duration {
        self.delay
    }

    fn on_failure(&self, error: &IxmqError) {
        self.metrics.lock().record_failure(error);
    }

    fn reset(&self) {
        self.metrics.lock().reset();
    }

    fn name(&self) -> &str {
        "FixedDelay"
    }
}

/// Builder for [`FixedDelay`].
#[derive(Debug)]
pub struct FixedDelayBuilder {
    delay: Duration,
    max_restarts: Option<u32>,
}

impl Default for FixedDelayBuilder {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_restarts: None,
        }
    }
}

impl FixedDelayBuilder {
    /// Set the delay between restarts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the maximum number of restarts.
    pub fn max_restarts(mut self, max: Option<u32>) -> Self {
        self.max_restarts = max;
        self
    }

    /// Build the strategy.
    pub fn build(self) -> FixedDelay {
        FixedDelay {
            delay: self.delay,
            max_restarts: self.max_restarts,
            metrics: Mutex::new(RestartMetrics::new()),
        }
    }
}
