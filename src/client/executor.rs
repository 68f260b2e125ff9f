// ABOUTME: DatagenClient - executes remote tools with retry and backoff.
// ABOUTME: Owns read-only config plus a shared transport; safe to clone and share.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::envelope::ToolRequest;
use super::outcome::{AttemptOutcome, classify};
use super::transport::{ReqwestTransport, Transport};
use crate::config::{ClientConfig, ConfigSource};
use crate::error::{DatagenError, Result};

/// Client for the tool execution gateway.
#[derive(Clone)]
pub struct DatagenClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl DatagenClient {
    /// Create a client with the given API key and default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::builder().api_key(api_key).build()?)
    }

    /// Create a client from the `DATAGEN_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::builder().build()?)
    }

    /// Create a client whose API key comes from `source`.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        Self::with_config(ClientConfig::builder().build_with(source)?)
    }

    /// Create a client over the default reqwest transport.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a tool and return its unwrapped result.
    ///
    /// `parameters` must be a JSON object; `null` is treated as `{}`.
    pub async fn execute(&self, tool_alias_name: &str, parameters: Value) -> Result<Value> {
        let parameters = match parameters {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(DatagenError::InvalidArgument(format!(
                    "parameters must be a JSON object, got {}",
                    other
                )));
            }
        };

        let request = ToolRequest::new(tool_alias_name).parameters(parameters);
        self.execute_request(&request).await
    }

    /// Execute a tool that takes no parameters.
    pub async fn execute_without_params(&self, tool_alias_name: &str) -> Result<Value> {
        self.execute_request(&ToolRequest::new(tool_alias_name)).await
    }

    /// Execute a prepared request.
    #[instrument(skip(self, request), fields(tool = %request.tool_alias_name))]
    pub async fn execute_request(&self, request: &ToolRequest) -> Result<Value> {
        if request.tool_alias_name.is_empty() {
            return Err(DatagenError::InvalidArgument(
                "tool_alias_name is required".to_string(),
            ));
        }

        let body = serde_json::to_value(request)
            .map_err(|e| DatagenError::InvalidArgument(format!("unserializable request: {}", e)))?;
        let url = self.config.execute_url();
        let retry = self.config.retry();
        let mut retry_index = 0u32;

        loop {
            let attempt = retry_index + 1;
            debug!(attempt, max_attempts = retry.max_attempts(), "Sending tool request");

            let result = self
                .transport
                .post_json(&url, self.config.api_key(), &body, self.config.timeout())
                .await;

            match classify(result) {
                AttemptOutcome::Success(value) => return Ok(value),
                AttemptOutcome::Terminal(err) => {
                    debug!(attempt, error = %err, "Terminal failure");
                    return Err(err);
                }
                AttemptOutcome::Retryable(err) => {
                    if retry_index >= retry.max_retries() {
                        warn!(attempt, error = %err, "Retries exhausted");
                        return Err(err);
                    }
                    let delay = retry.delay_for(retry_index);
                    warn!(attempt, ?delay, error = %err, "Attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    retry_index += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for DatagenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatagenClient")
            .field("config", &self.config)
            .finish()
    }
}
