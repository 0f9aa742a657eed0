//! Broker engine
//!
//! This module contains the in-memory broker responsible for:
//! - managing the set of named queues
//! - appending to and popping from a queue in FIFO order
//! - draining queues and reporting per-queue counters
//!
//! Concurrency and usage notes:
//! - The public API is synchronous and takes `&self`, so a single broker can
//!   be shared as `Arc<Broker>` by any number of request handlers.
//! - Locking is two-level. The index lock guards the name -> queue map and is
//!   only held to insert, remove or clone one entry. Each queue has its own
//!   lock, taken after the index lock has been released.
//! - A put/get that looked a queue up just before a concurrent delete still
//!   completes against the removed queue. Its effect is simply no longer
//!   visible through the broker.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::broker::message::{Message, Stats};
use crate::broker::queue::Queue;
use crate::utils::error::{BrokerError, BrokerResult};

#[derive(Debug, Default)]
pub struct Broker {
    queues: RwLock<HashMap<String, Arc<Queue>>>,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty queue. Fails if the name is already taken.
    pub fn create_queue(&self, name: &str) -> BrokerResult<()> {
        validate_name(name)?;
        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        if queues.contains_key(name) {
            return Err(BrokerError::AlreadyExists(name.to_string()));
        }
        queues.insert(name.to_string(), Arc::new(Queue::new(name)));
        debug!("Created queue {name}");
        Ok(())
    }

    /// Remove a queue from the index, discarding whatever it still holds.
    pub fn delete_queue(&self, name: &str) -> BrokerResult<()> {
        validate_name(name)?;
        let mut queues = self.queues.write().unwrap_or_else(PoisonError::into_inner);
        match queues.remove(name) {
            Some(_) => {
                debug!("Deleted queue {name}");
                Ok(())
            }
            None => Err(BrokerError::NotFound(name.to_string())),
        }
    }

    /// Empty a queue. The removed messages count towards `drained` only.
    pub fn drain_queue(&self, name: &str) -> BrokerResult<()> {
        let queue = self.lookup(name)?;
        let removed = queue.drain();
        debug!("Drained {removed} messages from queue {name}");
        Ok(())
    }

    /// Append `body` to the named queue and return the stored message.
    pub fn put_message(&self, name: &str, body: impl Into<String>) -> BrokerResult<Message> {
        let queue = self.lookup(name)?;
        let message = Message::new(body);
        queue.push(message.clone());
        Ok(message)
    }

    /// Pop the oldest message of the named queue.
    ///
    /// Returns `EmptyQueue` rather than waiting when there is nothing to take.
    pub fn get_message(&self, name: &str) -> BrokerResult<Message> {
        let queue = self.lookup(name)?;
        queue
            .pop()
            .ok_or_else(|| BrokerError::EmptyQueue(name.to_string()))
    }

    /// Counters for every queue, sorted by name.
    ///
    /// Each record is consistent on its own; the snapshot as a whole is not
    /// taken at a single instant.
    pub fn stats(&self) -> Stats {
        let handles: Vec<Arc<Queue>> = {
            let queues = self.queues.read().unwrap_or_else(PoisonError::into_inner);
            queues.values().cloned().collect()
        };

        let mut queues: Vec<_> = handles.iter().map(|q| q.stats()).collect();
        queues.sort_by(|a, b| a.name.cmp(&b.name));
        Stats { queues }
    }

    pub fn queue_names(&self) -> Vec<String> {
        let queues = self.queues.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = queues.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.queues
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a handle to a queue. The index lock is released on return, so
    /// the queue may be deleted before the caller uses the handle.
    pub(crate) fn lookup(&self, name: &str) -> BrokerResult<Arc<Queue>> {
        validate_name(name)?;
        let queues = self.queues.read().unwrap_or_else(PoisonError::into_inner);
        queues
            .get(name)
            .cloned()
            .ok_or_else(|| BrokerError::NotFound(name.to_string()))
    }
}

fn validate_name(name: &str) -> BrokerResult<()> {
    if name.is_empty() {
        return Err(BrokerError::InvalidName);
    }
    Ok(())
}
