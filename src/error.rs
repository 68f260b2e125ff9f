// ABOUTME: Defines all error types for the datagen client using thiserror.
// ABOUTME: HTTP-layer failures nest under DatagenError::Http.

/// Top-level error type for the datagen client.
#[derive(Debug, thiserror::Error)]
pub enum DatagenError {
    #[error("API key missing. Set {0} or pass an api_key.")]
    AuthConfiguration(&'static str),

    #[error("Auth failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Tool execution failed: {0}")]
    ToolExecution(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors at the HTTP/protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected response: {0}")]
    MalformedResponse(String),
}

/// Failures below the HTTP status line: the request never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request could not be built, e.g. an unparseable URL or header value.
    #[error("invalid request: {0}")]
    Request(String),

    #[error("request failed: {0}")]
    Other(String),
}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        HttpError::Network(err.to_string())
    }
}

impl DatagenError {
    /// True for 401/403 responses.
    pub fn is_auth(&self) -> bool {
        matches!(self, DatagenError::Auth { .. })
    }

    pub fn is_http(&self) -> bool {
        matches!(self, DatagenError::Http(_))
    }

    pub fn is_tool_error(&self) -> bool {
        matches!(self, DatagenError::ToolExecution(_))
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DatagenError::Auth { status, .. } => Some(*status),
            DatagenError::Http(HttpError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatagenError>;
