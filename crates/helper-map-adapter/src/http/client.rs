/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::http::{HelperError, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default base URL of the marketplace backend
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Response to a request whose status code does not drive control flow.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptAck {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// HTTP client for the marketplace backend
#[derive(Debug, Clone)]
pub struct HelperClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
}

impl HelperClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client pointed at an explicit backend
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint
    fn url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint)
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(
        &self,
        method: Method,
        endpoint: &str,
    ) -> std::result::Result<RequestBuilder, url::ParseError> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request, require a 2xx status and decode the JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|err| self.map_send_error(err))?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(HelperError::api_error(status, error_message(&body)));
        }

        serde_json::from_str(&body).map_err(HelperError::from)
    }

    /// Send a request and require a 2xx status, ignoring the body
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        let response = builder.send().await.map_err(|err| self.map_send_error(err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HelperError::api_error(status, error_message(&body)));
        }
        Ok(())
    }

    /// Send a request and decode any JSON body regardless of status
    pub(crate) async fn send_any_json(&self, builder: RequestBuilder) -> Result<AcceptAck> {
        let response = builder.send().await.map_err(|err| self.map_send_error(err))?;
        let status = response.status();
        let body = response.text().await?;
        let body = serde_json::from_str(&body).map_err(|err| {
            HelperError::InvalidResponse(format!("status {status}: body is not JSON ({err})"))
        })?;
        Ok(AcceptAck { status, body })
    }

    fn map_send_error(&self, err: reqwest::Error) -> HelperError {
        if err.is_timeout() {
            HelperError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else {
            HelperError::Http(err)
        }
    }
}

/// Pull the `error` field out of a JSON error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|err| err.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
