//! Error types for the Brandmark generation pipeline.
//!
//! Tier failures (`TierError`) are caught by the orchestrator and trigger a
//! fallback to the next tier. Only the last tier's failure reaches callers,
//! wrapped in `BrandmarkError::Operation` with the operation that failed.

use thiserror::Error;

use crate::types::Operation;

/// Top-level error type for Brandmark operations.
#[derive(Error, Debug)]
pub enum BrandmarkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Every tier in the chain failed; carries the last tier's error
    #[error("Failed to {operation}: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: TierError,
    },

    /// The request was rejected before any tier was attempted
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested artifact does not exist in the store
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failure of a single tier attempt.
#[derive(Error, Debug)]
pub enum TierError {
    /// A required credential is absent; the tier is disabled, never fatal on its own
    #[error("{backend} is not configured: {message}")]
    Configuration { backend: String, message: String },

    /// Network failure, auth/quota rejection, or a response without usable content
    #[error("{backend} request failed: {message}")]
    RemoteService {
        backend: String,
        message: String,
        status_code: Option<u16>,
    },

    /// Malformed or corrupt input image, or a failed local transform
    #[error("Image processing failed: {0}")]
    Processing(String),

    /// Persisting the artifact failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl TierError {
    pub(crate) fn remote(backend: &str, message: impl Into<String>) -> Self {
        Self::RemoteService {
            backend: backend.to_string(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Short classification used in fallback log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            TierError::Configuration { .. } => "unconfigured",
            TierError::RemoteService {
                status_code: Some(401 | 403),
                ..
            } => "auth",
            TierError::RemoteService {
                status_code: Some(429),
                ..
            } => "quota",
            TierError::RemoteService { .. } => "remote",
            TierError::Processing(_) => "processing",
            TierError::Storage(_) => "storage",
        }
    }
}

/// Convenience type alias for Brandmark results.
pub type Result<T> = std::result::Result<T, BrandmarkError>;

/// Convenience type alias for tier-level results.
pub type TierResult<T> = std::result::Result<T, TierError>;
