//! Queue state
//!
//! A `Queue` is a named FIFO of messages plus its lifetime counters. Each
//! queue carries its own lock; the broker only hands out `Arc<Queue>` handles
//! and never holds its index lock while a queue lock is taken.
//!
//! `depth` is derived from the message list, so
//! `depth == enqueued - dequeued - drained` holds whenever the lock is free.

use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::broker::message::{Message, QueueStats};

#[derive(Debug, Default)]
struct QueueState {
    messages: VecDeque<Message>,
    enqueued: u64,
    dequeued: u64,
    drained: u64,
}

#[derive(Debug)]
pub struct Queue {
    name: String,
    state: RwLock<QueueState>,
}

impl Queue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(QueueState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a message to the tail.
    pub fn push(&self, message: Message) {
        let mut state = self.write();
        state.messages.push_back(message);
        state.enqueued += 1;
    }

    /// Pop the oldest message, or `None` when the queue is empty.
    pub fn pop(&self) -> Option<Message> {
        let mut state = self.write();
        let message = state.messages.pop_front()?;
        state.dequeued += 1;
        Some(message)
    }

    /// Discard every message, returning how many were removed.
    pub fn drain(&self) -> u64 {
        let mut state = self.write();
        let removed = state.messages.len() as u64;
        state.messages.clear();
        state.drained += removed;
        removed
    }

    pub fn depth(&self) -> u64 {
        self.read().messages.len() as u64
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.read();
        QueueStats {
            name: self.name.clone(),
            depth: state.messages.len() as u64,
            enqueued: state.enqueued,
            dequeued: state.dequeued,
            drained: state.drained,
        }
    }

    // Poison is ignored; no mutation above can be observed half-applied.
    fn read(&self) -> RwLockReadGuard<'_, QueueState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, QueueState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
