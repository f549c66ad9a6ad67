//! Download request model
//!
//! The request carries raw, caller-supplied scale and format values; they are
//! validated once per batch by the pipeline.

use super::node::SelectableNode;

/// One "download" request: the full configuration of a batch
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Ordered selection
    pub items: Vec<SelectableNode>,

    /// Raw scale as typed by the caller (`None` when absent)
    pub scale: Option<String>,

    /// Raw format tag (`None` selects PNG)
    pub format: Option<String>,

    /// Optional output path segment prepended to every artifact name
    pub output_prefix: Option<String>,

    /// Optional compression service URL
    pub compression_endpoint: Option<String>,

    /// Deliver only the compressed image
    pub compressed_only: bool,
}

impl ExportRequest {
    /// Create a request over a selection with default options
    pub fn new(items: Vec<SelectableNode>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    /// Set the raw scale
    pub fn with_scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    /// Set the raw format
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the output prefix
    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    /// Set the compression endpoint
    pub fn with_compression_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.compression_endpoint = Some(endpoint.into());
        self
    }

    /// Request compressed-only delivery
    pub fn compressed_only(mut self, compressed_only: bool) -> Self {
        self.compressed_only = compressed_only;
        self
    }

    /// Trimmed endpoint, `None` when absent or blank
    pub fn endpoint(&self) -> Option<&str> {
        self.compression_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Trimmed prefix without trailing `/`, `None` when absent or blank
    pub fn prefix(&self) -> Option<&str> {
        self.output_prefix
            .as_deref()
            .map(|p| p.trim().trim_end_matches('/'))
            .filter(|s| !s.is_empty())
    }

    /// `compressed_only` only takes effect when an endpoint is present
    pub fn effective_compressed_only(&self) -> bool {
        self.compressed_only && self.endpoint().is_some()
    }
}
