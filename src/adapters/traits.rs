//! Collaborator traits
//!
//! This module defines the seams between the batch pipeline and the outside
//! world: the host export capability, the compression service, the selection
//! provider, the persisted settings store and the artifact sink.

use crate::domain::{
    CompressionError, ExportOptions, ExportedArtifact, Result, SelectableNode,
};
use async_trait::async_trait;

/// Host raster-export capability
///
/// Called once per exportable item. A failure here aborts the whole batch.
#[async_trait]
pub trait NodeExporter: Send + Sync {
    /// Rasterize `node` with the given format and scale
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot produce the image.
    async fn export_node(&self, node: &SelectableNode, options: &ExportOptions) -> Result<Vec<u8>>;
}

/// Compression service client
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Send `bytes` to `endpoint` and return the compressed payload
    ///
    /// Returns `Ok(None)` without any network activity when the endpoint is
    /// absent or blank. A successful response with an empty body is returned
    /// as `Ok(Some(vec![]))`; the caller decides what that means.
    ///
    /// # Errors
    ///
    /// Returns [`CompressionError::Status`] for non-success responses and
    /// [`CompressionError::Transport`] when no response arrived.
    async fn compress(
        &self,
        bytes: &[u8],
        endpoint: Option<&str>,
    ) -> std::result::Result<Option<Vec<u8>>, CompressionError>;
}

/// Provider of the user's current selection
#[async_trait]
pub trait SelectionSource: Send + Sync {
    /// Ordered selection at the time of the request
    async fn current_selection(&self) -> Result<Vec<SelectableNode>>;
}

/// Persisted key/value settings
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Final destination of exported artifacts
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist one artifact under its name
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be stored.
    async fn deliver(&self, artifact: &ExportedArtifact) -> Result<()>;
}
