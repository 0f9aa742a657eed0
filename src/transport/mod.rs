//! The `transport` module exposes the broker over HTTP.
//!
//! It defines the JSON bodies exchanged with clients and the axum router that
//! forwards each request to the broker.

pub mod http;
pub mod message;


pub use http::{router, serve, start_http_server};
pub use message::ServerMessage;
