use serde_json::Value as JsonValue;
use tracing::{debug, error};

use crate::{PostpassError, Result};

/// Public Postpass interpreter endpoint
pub const DEFAULT_ENDPOINT: &str = "https://postpass.geofabrik.de/api/0.2/interpreter";

/// HTTP client for the Postpass interpreter
#[derive(Debug, Clone)]
pub struct PostpassClient {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for PostpassClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PostpassClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self::with_http(endpoint, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies)
    pub fn with_http(endpoint: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            http,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the query as the `data` form field and return the JSON response
    pub async fn query(&self, sql: &str) -> Result<JsonValue> {
        debug!("Dispatching {} byte query to {}", sql.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("data", sql)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            error!("Postpass query failed with {}", status);
            return Err(PostpassError::Network {
                status: status.as_u16(),
                reason,
            });
        }

        Ok(response.json::<JsonValue>().await?)
    }
}
