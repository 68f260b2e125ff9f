// ABOUTME: Transport trait - the single HTTP round trip the client depends on.
// ABOUTME: ReqwestTransport is the default; tests substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DatagenError, TransportError};

/// Header carrying the raw API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Status line and body of a delivered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends one JSON POST and returns whatever the server answered.
///
/// Implementations report non-2xx statuses as a normal [`TransportResponse`];
/// only failures that produced no response at all become a [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// HTTP transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, DatagenError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("datagen-rs/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DatagenError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { http })
    }

    /// Wrap an existing client, e.g. one with custom TLS or proxy settings.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Request(err.to_string())
    } else if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else if err.is_body() || err.is_decode() {
        TransportError::Body(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse { status, body })
    }
}
