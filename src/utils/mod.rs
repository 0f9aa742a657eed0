//! The `utils` module collects pieces shared across `memq`: the error types
//! and the logging bootstrap.

pub mod error;
pub mod logging;

pub use error::{BrokerError, BrokerResult, ClientError, ClientResult};
