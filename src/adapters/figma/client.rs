//! Design-tool REST API client
//!
//! Resolves node ids into [`SelectableNode`]s and renders nodes through the
//! images endpoint. The render endpoint answers with a short-lived download
//! URL that is fetched without the access token.

use super::models::{ImagesResponse, NodesResponse};
use crate::adapters::traits::NodeExporter;
use crate::config::{exposed, secret_string, FigmaConfig, SecretString};
use crate::domain::{
    ExportOptions, FigmaError, FileKey, LayerExportError, NodeId, Result, SelectableNode,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::time::Duration;

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Figma REST API client
///
/// # Example
///
/// ```no_run
/// use layer_export::adapters::figma::FigmaClient;
/// use layer_export::config::FigmaConfig;
/// use layer_export::domain::{FileKey, NodeId};
///
/// # async fn example(config: FigmaConfig) -> layer_export::domain::Result<()> {
/// let key = FileKey::new("AbC123").unwrap();
/// let client = FigmaClient::new(&config, key)?;
/// let selection = client
///     .resolve_selection(&[NodeId::new("12:345").unwrap()])
///     .await?;
/// println!("{} node(s)", selection.len());
/// # Ok(())
/// # }
/// ```
pub struct FigmaClient {
    client: Client,
    base_url: String,
    file_key: FileKey,
    token: SecretString,
}

impl FigmaClient {
    /// Create a client for one design file
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no access token is configured or the
    /// HTTP client cannot be built.
    pub fn new(config: &FigmaConfig, file_key: FileKey) -> Result<Self> {
        let token = exposed(config.access_token.as_ref())
            .map(|t| secret_string(t.to_string()))
            .ok_or_else(|| {
                LayerExportError::Configuration(
                    "figma.access_token is required to export layers".to_string(),
                )
            })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                LayerExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            file_key,
            token,
        })
    }

    /// Design file this client reads from
    pub fn file_key(&self) -> &FileKey {
        &self.file_key
    }

    /// Look up `ids` in the file, preserving the requested order
    ///
    /// `DOCUMENT` and `CANVAS` nodes come back without export support.
    ///
    /// # Errors
    ///
    /// Returns [`FigmaError::NodeNotFound`] for the first id the file does
    /// not contain.
    pub async fn resolve_selection(&self, ids: &[NodeId]) -> Result<Vec<SelectableNode>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/files/{}/nodes", self.base_url, self.file_key);
        let joined = ids.iter().map(NodeId::as_str).collect::<Vec<_>>().join(",");
        let response: NodesResponse = self.get_json(&url, &[("ids", joined)]).await?;

        let mut selection = Vec::with_capacity(ids.len());
        for id in ids {
            let doc = response
                .nodes
                .get(id.as_str())
                .and_then(Option::as_ref)
                .map(|entry| &entry.document)
                .ok_or_else(|| FigmaError::NodeNotFound(id.to_string()))?;

            tracing::debug!(
                node_id = %id,
                name = %doc.name,
                node_type = %doc.node_type,
                "Resolved node"
            );
            selection.push(SelectableNode::with_type(
                id.clone(),
                doc.name.clone(),
                doc.node_type.clone(),
            ));
        }

        Ok(selection)
    }

    async fn render_url(&self, node: &SelectableNode, options: &ExportOptions) -> Result<String> {
        let url = format!("{}/images/{}", self.base_url, self.file_key);
        let query = [
            ("ids", node.id.to_string()),
            ("format", options.format.extension().to_string()),
            ("scale", options.scale.get().to_string()),
        ];
        let mut response: ImagesResponse = self.get_json(&url, &query).await?;

        if let Some(err) = response.err.filter(|e| !e.is_empty()) {
            return Err(FigmaError::RenderFailed(format!("{}: {err}", node.id)).into());
        }

        response
            .images
            .remove(node.id.as_str())
            .flatten()
            .ok_or_else(|| {
                FigmaError::RenderFailed(format!("no image rendered for {}", node.id)).into()
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.token.expose_secret().as_str();
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, token)
            .query(query)
            .send()
            .await
            .map_err(|e| FigmaError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "Figma API request failed");
            return Err(FigmaError::from_status(status.as_u16(), body).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FigmaError::InvalidResponse(e.to_string()).into())
    }
}

#[async_trait]
impl NodeExporter for FigmaClient {
    async fn export_node(&self, node: &SelectableNode, options: &ExportOptions) -> Result<Vec<u8>> {
        let image_url = self.render_url(node, options).await?;

        let response = self
            .client
            .get(&image_url)
            .send()
            .await
            .map_err(|e| FigmaError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FigmaError::RenderFailed(format!(
                "download of {} returned {status}",
                node.id
            ))
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FigmaError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(
            node_id = %node.id,
            format = %options.format,
            scale = options.scale.get(),
            bytes = bytes.len(),
            "Rendered node"
        );
        Ok(bytes.to_vec())
    }
}
