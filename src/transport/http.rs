//! HTTP transport
//!
//! This file maps broker operations onto HTTP routes. Responsibilities:
//! - Extract the queue name from the path
//! - Pass the raw request body through as the message payload on enqueue
//! - Translate `BrokerError` into status codes (400, or 204 for an empty
//!   queue on dequeue)
//! - Serialize messages and stats as JSON
//!
//! Routes, relative to the configured base path:
//! - `GET    /stats`
//! - `PUT    /queues/{queue}`
//! - `DELETE /queues/{queue}`
//! - `POST   /queues/{queue}/drain`
//! - `POST   /queues/{queue}/enqueue`
//! - `POST   /queues/{queue}/dequeue`

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::broker::Broker;
use crate::config::Settings;
use crate::transport::message::ServerMessage;
use crate::utils::error::BrokerError;

/// A broker error on its way out as a `400 Bad Request` with the error text.
#[derive(Debug)]
pub struct ApiError(pub BrokerError);

impl From<BrokerError> for ApiError {
    fn from(err: BrokerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.0.to_string()).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Build the queue API mounted under `base_path`.
///
/// An empty base path (or `/`) mounts the routes at the root. Request bodies
/// are not size-limited.
pub fn router(broker: Arc<Broker>, base_path: &str) -> Router {
    let routes = Router::new()
        .route("/stats", get(get_stats))
        .route("/queues/", put(empty_name).delete(empty_name))
        .route("/queues/{queue}", put(create_queue).delete(delete_queue))
        .route("/queues/{queue}/drain", post(drain_queue))
        .route("/queues/{queue}/enqueue", post(enqueue))
        .route("/queues/{queue}/dequeue", post(dequeue))
        .with_state(broker);

    let base = base_path.trim_matches('/');
    let app = if base.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{base}"), routes)
    };

    app.layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until the listener fails.
pub async fn start_http_server(settings: &Settings, broker: Arc<Broker>) -> std::io::Result<()> {
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    serve(listener, broker, &settings.server.base_path).await
}

/// Serve the queue API on an already bound listener.
pub async fn serve(listener: TcpListener, broker: Arc<Broker>, base_path: &str) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("memq listening on http://{}{}", addr, base_path);
    }
    axum::serve(listener, router(broker, base_path)).await
}

async fn get_stats(State(broker): State<Arc<Broker>>) -> Json<ServerMessage> {
    Json(ServerMessage::Stats(broker.stats()))
}

async fn empty_name() -> ApiError {
    ApiError(BrokerError::InvalidName)
}

async fn create_queue(
    State(broker): State<Arc<Broker>>,
    Path(queue): Path<String>,
) -> ApiResult<StatusCode> {
    broker.create_queue(&queue)?;
    Ok(StatusCode::OK)
}

async fn delete_queue(
    State(broker): State<Arc<Broker>>,
    Path(queue): Path<String>,
) -> ApiResult<StatusCode> {
    broker.delete_queue(&queue)?;
    Ok(StatusCode::OK)
}

async fn drain_queue(
    State(broker): State<Arc<Broker>>,
    Path(queue): Path<String>,
) -> ApiResult<StatusCode> {
    broker.drain_queue(&queue)?;
    Ok(StatusCode::OK)
}

async fn enqueue(
    State(broker): State<Arc<Broker>>,
    Path(queue): Path<String>,
    body: Bytes,
) -> ApiResult<Json<ServerMessage>> {
    // JSON can only carry text; invalid UTF-8 becomes U+FFFD.
    let body = String::from_utf8_lossy(&body).into_owned();
    let message = broker.put_message(&queue, body)?;
    Ok(Json(ServerMessage::Message(message)))
}

async fn dequeue(State(broker): State<Arc<Broker>>, Path(queue): Path<String>) -> Response {
    match broker.get_message(&queue) {
        Ok(message) => Json(ServerMessage::Message(message)).into_response(),
        Err(BrokerError::EmptyQueue(_)) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => ApiError(err).into_response(),
    }
}
