// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use datagen::prelude::*;` to get started quickly.

pub use crate::client::{
    AttemptOutcome, DatagenClient, ReqwestTransport, ToolRequest, Transport, TransportResponse,
};
pub use crate::config::{
    API_KEY_ENV, ClientConfig, ClientConfigBuilder, ConfigSource, DEFAULT_BASE_URL, EnvSource,
    MapSource,
};
pub use crate::error::{DatagenError, HttpError, TransportError};
pub use crate::retry::RetryPolicy;
