//! Polling consumer
//!
//! `Consumer` pulls messages from one queue through a `Client` and hands each
//! to a callback. Dequeue never blocks on the server, so an empty queue and a
//! failed request both lead to a sleep of `poll_interval` before the next try.
//! The loop ends when the shutdown flag flips to `true` (or its sender is
//! dropped), or on the first empty poll when `exit_when_empty` is set.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::broker::Message;
use crate::client::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerExit {
    Shutdown,
    QueueEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerReport {
    pub processed: u64,
    pub exit: ConsumerExit,
}

#[derive(Debug, Clone)]
pub struct Consumer {
    client: Client,
    queue: String,
    poll_interval: Duration,
    exit_when_empty: bool,
}

impl Consumer {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(client: Client, queue: impl Into<String>) -> Self {
        Self {
            client,
            queue: queue.into(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            exit_when_empty: false,
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn exit_when_empty(mut self, exit: bool) -> Self {
        self.exit_when_empty = exit;
        self
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub async fn run<F>(&self, mut shutdown: watch::Receiver<bool>, mut handler: F) -> ConsumerReport
    where
        F: FnMut(Message),
    {
        info!("Consumer for queue {} starting", self.queue);
        let mut processed = 0;

        loop {
            let stopped = *shutdown.borrow();
            if stopped {
                break;
            }

            match self.client.dequeue(&self.queue).await {
                Ok(Some(message)) => {
                    processed += 1;
                    handler(message);
                    continue;
                }
                Ok(None) if self.exit_when_empty => {
                    info!("Queue {} is empty, consumer exiting", self.queue);
                    return ConsumerReport {
                        processed,
                        exit: ConsumerExit::QueueEmpty,
                    };
                }
                Ok(None) => {
                    debug!(
                        "Queue {} is empty. Retrying after {:?}",
                        self.queue, self.poll_interval
                    );
                }
                Err(e) => {
                    warn!(
                        "Error talking to server: {e}. Retrying after {:?}",
                        self.poll_interval
                    );
                }
            }

            let stop = tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => false,
                changed = shutdown.changed() => changed.is_err(),
            };
            if stop {
                break;
            }
        }

        info!("Consumer for queue {} shutting down", self.queue);
        ConsumerReport {
            processed,
            exit: ConsumerExit::Shutdown,
        }
    }
}
