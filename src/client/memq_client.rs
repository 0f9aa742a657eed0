//! Remote client
//!
//! `Client` speaks the HTTP queue protocol to a memq server and decodes the
//! answers back into broker types. The base URL includes the server's path
//! prefix, e.g. `http://127.0.0.1:8080/memq/server`.
//!
//! A `204 No Content` on dequeue means the queue exists but is empty and is
//! returned as `Ok(None)`. Any status of 300 or above becomes
//! `ClientError::Status` with the server's error text.

use reqwest::{StatusCode, Url};

use crate::broker::{Message, Stats};
use crate::transport::ServerMessage;
use crate::utils::error::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Build a client on top of an existing `reqwest::Client`, e.g. one with
    /// custom timeouts.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub async fn create_queue(&self, queue: &str) -> ClientResult<()> {
        let url = self.queue_url(queue, None)?;
        let response = self.http.put(url).send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn delete_queue(&self, queue: &str) -> ClientResult<()> {
        let url = self.queue_url(queue, None)?;
        let response = self.http.delete(url).send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn drain_queue(&self, queue: &str) -> ClientResult<()> {
        let url = self.queue_url(queue, Some("drain"))?;
        let response = self.http.post(url).send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn enqueue(&self, queue: &str, body: impl Into<String>) -> ClientResult<Message> {
        let url = self.queue_url(queue, Some("enqueue"))?;
        let response = self.http.post(url).body(body.into()).send().await?;
        match decode(check(response).await?).await? {
            ServerMessage::Message(message) => Ok(message),
            other => Err(ClientError::UnexpectedKind(other.kind().to_string())),
        }
    }

    /// Take the oldest message off `queue`. `Ok(None)` means the queue is
    /// currently empty.
    pub async fn dequeue(&self, queue: &str) -> ClientResult<Option<Message>> {
        let url = self.queue_url(queue, Some("dequeue"))?;
        let response = check(self.http.post(url).send().await?).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        match decode(response).await? {
            ServerMessage::Message(message) => Ok(Some(message)),
            other => Err(ClientError::UnexpectedKind(other.kind().to_string())),
        }
    }

    pub async fn stats(&self) -> ClientResult<Stats> {
        let url = self.url(&["stats"])?;
        let response = self.http.get(url).send().await?;
        match decode(check(response).await?).await? {
            ServerMessage::Stats(stats) => Ok(stats),
            other => Err(ClientError::UnexpectedKind(other.kind().to_string())),
        }
    }

    fn queue_url(&self, queue: &str, action: Option<&str>) -> ClientResult<Url> {
        if queue.is_empty() {
            return Err(ClientError::InvalidName);
        }
        match action {
            Some(action) => self.url(&["queues", queue, action]),
            None => self.url(&["queues", queue]),
        }
    }

    // Segments are percent-encoded, so a queue name is always one path segment.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.as_u16() >= 300 {
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status,
            message: message.trim().to_string(),
        });
    }
    Ok(response)
}

async fn decode(response: reqwest::Response) -> ClientResult<ServerMessage> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
