//! Domain models and types for layer-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`NodeId`], [`FileKey`])
//! - **Selection and options** ([`SelectableNode`], [`ExportFormat`], [`Scale`])
//! - **Requests and results** ([`ExportRequest`], [`ExportedArtifact`], [`PipelineEvent`])
//! - **Error types** ([`LayerExportError`], [`ValidationError`], [`CompressionError`], [`FigmaError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use layer_export::domain::{ExportRequest, NodeId, SelectableNode};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let node = SelectableNode::new(NodeId::new("12:34")?, "Hero");
//! let request = ExportRequest::new(vec![node])
//!     .with_scale("2")
//!     .with_format("png")
//!     .with_compression_endpoint("http://localhost:8765/compress");
//! assert!(!request.effective_compressed_only());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod errors;
pub mod ids;
pub mod node;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use artifact::{ExportedArtifact, PipelineEvent};
pub use errors::{
    CompressionError, FigmaError, LayerExportError, ShrinkError, ValidationError,
};
pub use ids::{FileKey, NodeId};
pub use node::{ExportFormat, ExportOptions, Scale, SelectableNode};
pub use request::ExportRequest;
pub use result::Result;
