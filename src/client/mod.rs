//! The `client` module talks to a memq server over HTTP.
//!
//! `Client` mirrors the broker operations one to one. `Consumer` builds a
//! polling loop on top of it for workloads that pull work items from a queue.

pub mod consumer;
pub mod memq_client;

pub use consumer::{Consumer, ConsumerExit, ConsumerReport};
pub use memq_client::Client;

#[cfg(test)]
mod tests;
