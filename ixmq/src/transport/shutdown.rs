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

//! Cooperative shutdown for serve loops.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How often serve loops wake up to check for shutdown while idle.
pub(crate) const SERVE_TICK: Duration = Duration::from_millis(100);

/// Requests that a serve loop stop.
///
/// Serve loops poll their sockets with a short tick and return `Ok(())` once
/// the handle has been triggered. Clones share the same flag.
///
/// # Examples
///
/// ```rust
/// use ixmq::transport::ShutdownHandle;
///
/// let handle = ShutdownHandle::new();
/// let remote = handle.clone();
/// remote.trigger();
/// assert!(handle.is_triggered());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Creates an untriggered handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the owning loop to stop after the message it is processing.
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once [`trigger`](Self::trigger) has been called.
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
