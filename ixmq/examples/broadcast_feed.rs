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

//! # Broadcast Feed Example
//!
//! Several async producers publish chain events through one broadcaster while
//! a subscriber listens to a single topic.
//!
//! ## What This Example Shows
//!
//! - Cloning [`Publisher`] handles into tokio tasks
//! - Running the socket-owning broadcaster on a blocking thread
//! - Topic filtering on the subscriber side
//!
//! ## Running This Example
//!
//! ```bash
//! RUST_LOG=ixmq=debug cargo run --example broadcast_feed
//! ```
//!
//! [`Publisher`]: ixmq::broadcast::Publisher

use ixmq::broadcast::Broadcaster;
use ixmq::client::Subscriber;
use ixmq::message::{Parameters, Reply};
use ixmq::transport::{Context, Endpoint};
use std::error::Error;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let context = Context::new();
    let broadcaster = Broadcaster::new(&context, Endpoint::publish("tcp://127.0.0.1:5556"))?;
    let subscriber = Subscriber::connect(
        &context,
        Endpoint::subscribe("tcp://127.0.0.1:5556"),
        &["blocks"],
    )?;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let producers: Vec<_> = ["blocks", "mempool"]
        .into_iter()
        .map(|topic| {
            let publisher = broadcaster.publisher();
            tokio::spawn(async move {
                for height in 0..5 {
                    let reply = Reply::ok(Parameters::new().with("height", height));
                    if publisher.publish(topic, reply).is_err() {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            })
        })
        .collect();
    let metrics = broadcaster.metrics();
    let runner = tokio::task::spawn_blocking(move || broadcaster.run());

    let listener = tokio::task::spawn_blocking(move || {
        let mut received = 0;
        while let Ok(Some(broadcast)) = subscriber.recv_timeout(Duration::from_secs(1)) {
            info!(
                topic = %broadcast.topic,
                height = ?broadcast.reply.parameters.get_i64("height"),
                "broadcast received"
            );
            received += 1;
        }
        received
    });

    for producer in producers {
        producer.await?;
    }
    runner.await??;
    let received = listener.await?;
    info!(published = metrics.published(), received, "feed finished");
    Ok(())
}
