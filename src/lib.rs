//! # memq
//!
//! `memq` is a small in-memory message broker with named FIFO queues. Queues
//! can be used directly through a `Broker` value or over a plain HTTP
//! produce/consume protocol with the bundled client.
//!
//! ## Core Modules
//!
//! - `broker`: queues, messages and the broker that owns them.
//! - `transport`: the HTTP routes that expose the broker.
//! - `client`: remote client for those routes, plus a polling consumer.
//! - `config`: loads settings from a file and the environment.
//! - `utils`: shared error types and logging setup.
//!
//! State is volatile: nothing survives a restart, and a dequeued message is
//! gone for good (at-most-once delivery).

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
