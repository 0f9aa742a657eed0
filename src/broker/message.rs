//! Message and statistics types for the broker
//!
//! `Message` is the unit of data moving through a queue. It is built once by
//! the broker on enqueue and never mutated afterwards.
//!
//! Notes on fields:
//! - `id`: 128 random bits from the OS generator, lowercase hex. Only used to
//!   identify a message, never to order or deduplicate
//! - `body`: opaque payload, stored as given
//! - `created`: UTC time of enqueue, RFC 3339 on the wire

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub body: String,
    pub created: DateTime<Utc>,
}

impl Message {
    /// Create a message with a fresh id, timestamped now.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            body: body.into(),
            created: Utc::now(),
        }
    }
}

/// Counters for a single queue, captured under that queue's lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub depth: u64,
    pub enqueued: u64,
    pub dequeued: u64,
    pub drained: u64,
}

/// Snapshot of every queue in a broker, ordered by queue name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub queues: Vec<QueueStats>,
}

impl Stats {
    pub fn get(&self, name: &str) -> Option<&QueueStats> {
        self.queues.iter().find(|q| q.name == name)
    }
}

fn new_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
