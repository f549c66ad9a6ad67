//! Exported artifacts and pipeline events

use std::fmt;
use std::sync::Arc;

/// One exported (optionally compressed) image plus its destination name
///
/// The bytes are shared and immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    bytes: Arc<[u8]>,
    name: String,
}

impl ExportedArtifact {
    /// Wrap bytes under a name produced by the name builder
    pub fn new(bytes: impl Into<Arc<[u8]>>, name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            name: name.into(),
        }
    }

    /// Image payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Destination name, possibly containing `/`-separated prefix segments
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ExportedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedArtifact")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Event emitted by a batch, in strict item order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// An image ready for the sink
    Artifact(ExportedArtifact),
    /// Recoverable per-item problem
    Warning(String),
    /// Batch aborted; terminal
    Fatal(String),
    /// Batch completed; terminal
    Done,
}

impl PipelineEvent {
    /// `Fatal` and `Done` end the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineEvent::Fatal(_) | PipelineEvent::Done)
    }
}
