// ABOUTME: Wire types - the tool request body and the two-level response envelope.
// ABOUTME: Envelope fields are optional so missing keys surface as malformed, not panics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HttpError;

/// Body of `POST /api/tools/execute`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolRequest {
    pub tool_alias_name: String,
    pub parameters: Map<String, Value>,
}

impl ToolRequest {
    pub fn new(tool_alias_name: impl Into<String>) -> Self {
        Self {
            tool_alias_name: tool_alias_name.into(),
            parameters: Map::new(),
        }
    }

    /// Add a single parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Replace all parameters.
    pub fn parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Outer envelope: `success` reflects gateway-level acceptance.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub success: Option<bool>,
    pub data: Option<Value>,
}

/// Inner payload: `success` reflects the tool's own outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolPayload {
    pub success: Option<bool>,
    pub result: Option<Value>,
    pub error: Option<Value>,
}

/// What a well-formed envelope says about the tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Completed(Value),
    Failed(String),
}

const MAX_SNIPPET: usize = 200;

/// Truncate a response body for inclusion in an error message.
pub(crate) fn snippet(body: &str) -> String {
    if body.chars().count() <= MAX_SNIPPET {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX_SNIPPET).collect();
        format!("{}...", cut)
    }
}

impl ToolPayload {
    fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Null) | None => "Tool reported failure".to_string(),
            Some(Value::String(_)) => "Tool reported failure".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Parse a 2xx response body into a tool outcome.
pub fn parse_envelope(body: &str) -> Result<ToolOutcome, HttpError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        HttpError::MalformedResponse(format!("invalid JSON ({}): {}", e, snippet(body)))
    })?;

    if !value.is_object() {
        return Err(HttpError::MalformedResponse(format!(
            "expected a JSON object: {}",
            snippet(body)
        )));
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|e| {
        HttpError::MalformedResponse(format!("invalid envelope ({}): {}", e, snippet(body)))
    })?;

    if envelope.success != Some(true) {
        return Err(HttpError::MalformedResponse(snippet(body)));
    }

    let data = match envelope.data {
        Some(data @ Value::Object(_)) => data,
        Some(_) => {
            return Err(HttpError::MalformedResponse(format!(
                "`data` is not an object: {}",
                snippet(body)
            )));
        }
        None => {
            return Err(HttpError::MalformedResponse(format!(
                "missing `data`: {}",
                snippet(body)
            )));
        }
    };

    let payload: ToolPayload = serde_json::from_value(data).map_err(|e| {
        HttpError::MalformedResponse(format!("invalid `data` ({}): {}", e, snippet(body)))
    })?;

    match payload.success {
        Some(true) => Ok(ToolOutcome::Completed(payload.result.unwrap_or(Value::Null))),
        Some(false) => Ok(ToolOutcome::Failed(payload.error_message())),
        None => Err(HttpError::MalformedResponse(format!(
            "missing `data.success`: {}",
            snippet(body)
        ))),
    }
}
