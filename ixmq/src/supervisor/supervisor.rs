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

//! Restarts serve loops that fail.

use crate::IxmqError;
use crate::observability::log_error;
use crate::supervisor::{RestartStrategy, SupervisorError};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs a blocking serve loop and restarts it per a [`RestartStrategy`].
///
/// Serve loops in this crate stop on transport faults instead of healing in
/// place. Each run happens on tokio's blocking pool, and when it fails the
/// strategy decides whether to wait and start a fresh instance.
///
/// The `launch` closure builds and serves a component from scratch, so each
/// restart gets new sockets.
///
/// # Examples
///
/// ```rust,no_run
/// use ixmq::message::{Reply, Request};
/// use ixmq::server::{HandlerTable, Server, ServerKind};
/// use ixmq::supervisor::{ExponentialBackoff, Supervisor};
/// use ixmq::transport::{Context, Endpoint};
/// use std::sync::Arc;
/// use tracing::Span;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let context = Context::new();
/// let supervisor = Supervisor::new("echo", Arc::new(ExponentialBackoff::default()));
///
/// supervisor
///     .run(move || {
///         let handlers = HandlerTable::new()
///             .with("echo", |request: Request, _: &Span, _: &()| Reply::ok(request.parameters))?;
///         let server = Server::bind(
///             &context,
///             Endpoint::bind_local("tcp://*:5555"),
///             ServerKind::Reply,
///             handlers,
///         )?;
///         Ok(server.serve(&())?)
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Supervisor {
    name: String,
    strategy: Arc<dyn RestartStrategy>,
}

impl Supervisor {
    /// Creates a supervisor.
    pub fn new(name: impl Into<String>, strategy: Arc<dyn RestartStrategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }

    /// Name used in logs and errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs `launch` until it returns `Ok(())` or the strategy gives up.
    pub async fn run<F>(&self, launch: F) -> Result<(), SupervisorError>
    where
        F: Fn() -> Result<(), IxmqError> + Send + Sync + 'static,
    {
        let launch = Arc::new(launch);
        let mut restarts = 0u32;

        loop {
            info!(supervisor = %self.name, run = restarts + 1, "starting");
            let task = Arc::clone(&launch);
            let error = match tokio::task::spawn_blocking(move || task()).await {
                Ok(Ok(())) => {
                    info!(supervisor = %self.name, "stopped cleanly");
                    return Ok(());
                }
                Ok(Err(error)) => error,
                Err(join_error) => {
                    return Err(SupervisorError::Panicked {
                        name: self.name.clone(),
                        message: join_error.to_string(),
                    });
                }
            };

            log_error(&error);
            self.strategy.on_failure(&error);

            if !self.strategy.should_restart(restarts, &error).await {
                warn!(
                    supervisor = %self.name,
                    strategy = self.strategy.name(),
                    runs = restarts + 1,
                    "giving up"
                );
                return Err(SupervisorError::GaveUp {
                    name: self.name.clone(),
                    runs: restarts + 1,
                    last_error: error,
                });
            }

            let delay = self.strategy.next_delay(restarts).await;
            warn!(
                supervisor = %self.name,
                strategy = self.strategy.name(),
                delay = ?delay,
                "restarting"
            );
            tokio::time::sleep(delay).await;
            restarts = restarts.saturating_add(1);
        }
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("name", &self.name)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}
