//! The `error` module defines the error types used within `memq`.
//!
//! `BrokerError` is returned by every broker operation and is carried verbatim
//! to the HTTP layer. `ClientError` is what the remote client proxy reports when
//! a request fails, either on the wire or because the server rejected it.

use reqwest::StatusCode;

/// Errors produced by the in-memory broker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("empty name")]
    InvalidName,

    #[error("queue '{0}' already exists")]
    AlreadyExists(String),

    #[error("queue '{0}' does not exist")]
    NotFound(String),

    /// The queue exists but holds no messages. Callers polling a queue treat
    /// this as "try again later", unlike `NotFound`.
    #[error("queue '{0}' is empty")]
    EmptyQueue(String),
}

/// Errors produced by the HTTP client proxy.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("empty name")]
    InvalidName,

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP Error: {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response kind '{0}'")]
    UnexpectedKind(String),
}

pub type BrokerResult<T> = std::result::Result<T, BrokerError>;
pub type ClientResult<T> = std::result::Result<T, ClientError>;
