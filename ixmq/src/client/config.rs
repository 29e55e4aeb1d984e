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

//! Request policy configuration.

use crate::client::ClientError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::timeout`], in milliseconds.
pub const TIMEOUT_ENV: &str = "IXMQ_REQUEST_TIMEOUT_MS";

/// Environment variable overriding [`ClientConfig::attempts`].
pub const ATTEMPTS_ENV: &str = "IXMQ_REQUEST_ATTEMPTS";

/// Retry policy for a [`Client`](crate::client::Client).
///
/// A request is sent once, then resent up to `attempts` more times after a
/// timeout, so the worst case wait is `timeout * (attempts + 1)`.
///
/// # Examples
///
/// ```rust
/// use ixmq::client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_timeout(Duration::from_millis(500))
///     .with_attempts(2);
///
/// assert_eq!(config.worst_case(), Duration::from_millis(1500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How long to wait for each reply
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,
    /// How many times to resend after a timeout
    pub attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            attempts: 5,
        }
    }
}

impl ClientConfig {
    /// Creates the default policy: 30 second timeout, 5 retries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-attempt reply timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of resends after a timeout.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Reads the policy from the process environment.
    ///
    /// Unset variables keep their default. A variable that is set but does
    /// not parse is an error rather than being silently ignored.
    pub fn from_env() -> Result<Self, ClientError> {
        let mut config = Self::default();
        if let Some(ms) = read_env::<u64>(TIMEOUT_ENV)? {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(attempts) = read_env::<u32>(ATTEMPTS_ENV)? {
            config.attempts = attempts;
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects a zero timeout.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.timeout.is_zero() {
            return Err(ClientError::Configuration {
                reason: "request timeout must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Longest time a single request can block before timing out.
    pub fn worst_case(&self) -> Duration {
        self.timeout.saturating_mul(self.attempts.saturating_add(1))
    }
}

fn read_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ClientError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ClientError::Configuration {
                reason: format!("{name} is not a valid number: {raw:?}"),
            }),
        Err(_) => Ok(None),
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
