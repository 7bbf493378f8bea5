//! Error types for the snapshot manager
//!
//! Inventory calls and configuration loading have structured errors so
//! callers can tell a service failure from a bad config. Everything above
//! them works in `anyhow::Result` and adds context as it goes.

use thiserror::Error;

/// Failures talking to the volume/snapshot inventory service
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The request never produced a response (connect, timeout, TLS)
    #[error("Inventory request '{operation}' failed: {reason}")]
    Request { operation: String, reason: String },

    /// The service answered with a non-success status
    #[error("Inventory '{operation}' returned status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded
    #[error("Invalid response for '{operation}': {reason}")]
    Decode { operation: String, reason: String },
}

impl InventoryError {
    pub fn operation(&self) -> &str {
        match self {
            InventoryError::Request { operation, .. }
            | InventoryError::Status { operation, .. }
            | InventoryError::Decode { operation, .. } => operation,
        }
    }
}

/// Configuration error variants
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to load config from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// The file is not valid TOML for the expected shape
    #[error("Failed to parse config '{path}': {reason}")]
    ParseError { path: String, reason: String },

    /// A value is present but unusable
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
