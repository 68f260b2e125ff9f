// ABOUTME: Root module for datagen - a client for the tool execution gateway.
// ABOUTME: Re-exports the client, configuration, and error types.

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;
pub mod retry;

pub use client::{DatagenClient, ToolRequest, Transport};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{DatagenError, HttpError, Result};
