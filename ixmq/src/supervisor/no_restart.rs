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

//! Strategy that never restarts.

use crate::IxmqError;
use crate::supervisor::traits::{RestartMetrics, RestartStrategy};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

/// A strategy that never restarts.
///
/// The supervisor reports the first failure and stops. Useful in tests and
/// for processes that leave restarts to an outer service manager.
///
/// # Examples
///
/// ```
/// use ixmq::supervisor::NoRestart;
///
/// let strategy = NoRestart::new();
/// ```
#[derive(Debug, Default)]
pub struct NoRestart {
    metrics: Mutex<RestartMetrics>,
}

impl NoRestart {
    /// Create a new no-restart strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current metrics.
    pub fn metrics(&self) -> RestartMetrics {
        self.metrics.lock().clone()
    }
}

#[async_trait]
impl RestartStrategy for NoRestart {
    async fn should_restart(&self, _attempt: u32, _last_error: &IxmqError) -> bool {
        false
    }

    async fn next_delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }

    fn on_failure(&self, error: &IxmqError) {
        self.metrics.lock().record_failure(error);
    }

    fn reset(&self) {
        self.metrics.lock().reset();
    }

    fn name(&self) -> &str {
        "NoRestart"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::ServerError;
    use crate::transport::TransportError;

    #[tokio::test]
    async fn test_should_never_restart() {
        let strategy = NoRestart::new();
        let error = IxmqError::from(ServerError::Transport(TransportError::Closed));

        assert!(!strategy.should_restart(0, &error).await);
        assert!(!strategy.should_restart(100, &error).await);
    }

    #[test]
    fn test_records_failures() {
        let strategy = NoRestart::new();
        strategy.on_failure(&IxmqError::from(TransportError::Closed));
        assert_eq!(strategy.metrics().failures, 1);
        strategy.reset();
        assert_eq!(strategy.metrics().failures, 0);
    }
}
