//! # Transport
//!
//! The seam between the fetch cache and the network. The cache only ever talks
//! to a [`Transport`], so tests swap in [`MockTransport`](crate::framework::mock::MockTransport)
//! while the binary uses [`HttpTransport`].

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::error::FetchError;

/// Issues raw requests for resource paths and returns the decoded JSON body.
///
/// Implementations must turn every failure into a [`FetchError`]; nothing
/// may panic or escape past this boundary.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// GET `path` and return the JSON body (object or array).
    async fn get(&self, path: &str) -> Result<Value, FetchError>;

    /// POST `body` as JSON to `path` and return the JSON response body.
    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError>;
}

/// [`Transport`] backed by `reqwest`, resolving paths against a base URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Checks the status and shape of a response.
///
/// Only a 2xx response carrying a JSON object or array counts as data.
async fn read_body(response: reqwest::Response) -> Result<Value, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let value: Value = response
        .json()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))?;

    if value.is_array() || value.is_object() {
        Ok(value)
    } else {
        Err(FetchError::InvalidFormat)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        read_body(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        read_body(response).await
    }
}
