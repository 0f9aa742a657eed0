//! memq broker
//!
//! The broker owns every named queue and exposes the lifecycle operations
//! (create, delete, drain) and the data operations (put, get, stats) over
//! them. It is shared by the HTTP transport as `Arc<Broker>`.

pub mod engine;
pub mod message;
pub mod queue;

pub use engine::Broker;
pub use message::{Message, QueueStats, Stats};
