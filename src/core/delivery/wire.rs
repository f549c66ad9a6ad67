//! UI message protocol
//!
//! JSON messages exchanged with a design-tool UI panel. Inbound messages are
//! tagged by `type`; outbound messages mirror the panel's expectations, which
//! use a single `error` kind for both fatal aborts and per-item warnings.

use crate::domain::{ExportRequest, PipelineEvent, SelectableNode};
use serde::{Deserialize, Deserializer, Serialize};

/// Messages sent by the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiMessage {
    /// Ask for the remembered compression URL
    GetConfig,
    /// Start a batch over the current selection
    Download(DownloadMessage),
}

/// Payload of a `download` message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadMessage {
    /// Number or string
    #[serde(default, deserialize_with = "lenient_string")]
    pub scale: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_service_url: Option<String>,

    #[serde(default)]
    pub only_compressed: bool,
}

impl DownloadMessage {
    /// Bind the message to a selection
    pub fn into_request(self, items: Vec<SelectableNode>) -> ExportRequest {
        ExportRequest {
            items,
            scale: self.scale,
            format: self.format,
            output_prefix: self.output_path,
            compression_endpoint: self.compress_service_url,
            compressed_only: self.only_compressed,
        }
    }
}

/// Messages sent to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PluginMessage {
    /// Reply to `getConfig`
    #[serde(rename_all = "camelCase")]
    Init { compress_service_url: String },
    /// One artifact to save
    Export { bytes: Vec<u8>, name: String },
    /// Batch finished without a fatal error
    Done,
    /// Fatal abort or per-item warning
    Error { message: String },
}

impl From<&PipelineEvent> for PluginMessage {
    fn from(event: &PipelineEvent) -> Self {
        match event {
            PipelineEvent::Artifact(artifact) => PluginMessage::Export {
                bytes: artifact.bytes().to_vec(),
                name: artifact.name().to_string(),
            },
            PipelineEvent::Warning(message) | PipelineEvent::Fatal(message) => {
                PluginMessage::Error {
                    message: message.clone(),
                }
            }
            PipelineEvent::Done => PluginMessage::Done,
        }
    }
}

/// Accept strings, numbers and booleans; null becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
