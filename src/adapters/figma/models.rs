//! REST API response models

use serde::Deserialize;
use std::collections::HashMap;

/// `GET /files/{key}/nodes`
#[derive(Debug, Deserialize)]
pub struct NodesResponse {
    /// Requested id to node; `null` when the id does not exist
    #[serde(default)]
    pub nodes: HashMap<String, Option<NodeEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct NodeEntry {
    pub document: NodeDocument,
}

#[derive(Debug, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
}

/// `GET /images/{key}`
#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub err: Option<String>,

    /// Requested id to render URL; `null` when rendering failed
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}
