//! Selection and export option models
//!
//! A [`SelectableNode`] is supplied by the selection collaborator before a
//! batch starts and is never created or destroyed by the pipeline.

use super::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node picked by the user in the design tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableNode {
    /// Unique within one selection
    pub id: NodeId,

    /// Display name
    pub name: String,

    /// Host node type (e.g. `FRAME`, `COMPONENT`), when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    supports_export: bool,
}

impl SelectableNode {
    /// Create an exportable node
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            node_type: None,
            supports_export: true,
        }
    }

    /// Create a node from a host type name; document and page nodes cannot
    /// be rasterized
    pub fn with_type(id: NodeId, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        let supports_export = !matches!(node_type.as_str(), "DOCUMENT" | "CANVAS");
        Self {
            id,
            name: name.into(),
            node_type: Some(node_type),
            supports_export,
        }
    }

    /// Override the export capability
    pub fn with_export_support(mut self, supports_export: bool) -> Self {
        self.supports_export = supports_export;
        self
    }

    /// Whether the host can rasterize this node
    pub fn supports_export(&self) -> bool {
        self.supports_export
    }
}

/// Raster formats accepted by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExportFormat {
    /// Portable Network Graphics
    Png,
    /// JPEG
    Jpg,
}

impl ExportFormat {
    /// Every supported format
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Png, ExportFormat::Jpg];

    /// Upper-case tag as requested by callers
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::Jpg => "JPG",
        }
    }

    /// File extension (without dot); also the REST API `format` value
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
        }
    }

    /// Match an already upper-cased tag
    pub(crate) fn from_upper(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == tag)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export scale factor, always within `1..=4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scale(u8);

impl Scale {
    /// Smallest accepted scale
    pub const MIN: u8 = 1;
    /// Largest accepted scale
    pub const MAX: u8 = 4;
    /// Scale used when the request carries none
    pub const DEFAULT: Scale = Scale(3);

    /// Clamp any integer into the accepted range
    pub fn clamped(value: i64) -> Self {
        Scale(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// The numeric factor
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Options handed to the export capability for every item of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub scale: Scale,
}
