use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{AppError, ServeError};

/// Header carrying the upstream gateway subscription key.
pub const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// HTTP client for the backend every endpoint forwards to.
pub struct Upstream {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Upstream {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> Result<Value, AppError> {
        debug!(path, "Forwarding GET");
        self.execute(path, self.client.get(self.url(path))).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, AppError> {
        debug!(path, "Forwarding POST");
        self.execute(path, self.client.post(self.url(path)).json(body))
            .await
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Value, AppError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key.as_str()),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            warn!(path, error = %e, "Upstream request failed");
            AppError::Upstream(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "Upstream returned error status");
            return Err(AppError::UpstreamStatus(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            warn!(path, error = %e, "Upstream body is not JSON");
            AppError::Upstream(e.to_string())
        })
    }
}
