//! Domain error types
//!
//! This module defines the error hierarchy for layer-export.
//! Errors are domain-specific and don't expose third-party HTTP client types.

use thiserror::Error;

/// Main layer-export error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum LayerExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request validation errors (format, scale)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Design-tool export capability errors
    #[error("Figma error: {0}")]
    Figma(#[from] FigmaError),

    /// Compression service errors
    #[error(transparent)]
    Compression(#[from] CompressionError),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Persisted settings errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// Artifact delivery errors (sink, channel)
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// A batch is already running
    #[error("An export batch is already in progress")]
    BatchInProgress,

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while normalizing a download request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The requested raster format is not PNG or JPG
    #[error("unsupported format: {0}, use PNG or JPG")]
    UnsupportedFormat(String),
}

/// Compression service errors
///
/// A failure here is always recoverable at the batch level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    /// The service answered with a non-success status
    #[error("compression service returned {0}")]
    Status(u16),

    /// The request never produced a response
    #[error("compression service unreachable: {0}")]
    Transport(String),

    /// The configured endpoint is not a usable URL
    #[error("invalid compression endpoint: {0}")]
    InvalidEndpoint(String),
}

impl CompressionError {
    /// Status code reported by the service, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CompressionError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Design-tool REST API errors
///
/// Errors that occur when resolving or rendering nodes through the Figma API.
#[derive(Debug, Error)]
pub enum FigmaError {
    /// Failed to reach the API
    #[error("Failed to connect to Figma API: {0}")]
    ConnectionFailed(String),

    /// Token missing or rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Node id unknown in the file
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The renderer refused or failed to produce an image
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// Response body did not match the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Not a recognizable design file URL
    #[error("Invalid Figma URL: {0}")]
    InvalidUrl(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

impl FigmaError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => FigmaError::AuthenticationFailed(message),
            500..=599 => FigmaError::ServerError { status, message },
            _ => FigmaError::ClientError { status, message },
        }
    }
}

/// TinyPNG upstream errors, surfaced by the local compression service
#[derive(Debug, Error)]
pub enum ShrinkError {
    /// No API key configured
    #[error("TINYPNG_API_KEY is not set")]
    MissingApiKey,

    /// Upstream rejected the shrink request
    #[error("TinyPNG returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Shrink succeeded but carried no output location
    #[error("TinyPNG response did not contain output.url")]
    MissingOutputUrl,

    /// Network failure talking to TinyPNG
    #[error("TinyPNG request failed: {0}")]
    Transport(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for LayerExportError {
    fn from(err: std::io::Error) -> Self {
        LayerExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LayerExportError {
    fn from(err: serde_json::Error) -> Self {
        LayerExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for LayerExportError {
    fn from(err: toml::de::Error) -> Self {
        LayerExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
