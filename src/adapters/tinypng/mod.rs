//! TinyPNG client used by the local compression service
//!
//! A shrink is two requests: `POST /shrink` with the image (answered `201`
//! with an `output.url`), then a download of that URL.

use crate::domain::{LayerExportError, Result, ShrinkError};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ShrinkResponse {
    #[serde(default)]
    output: Option<ShrinkOutput>,
}

#[derive(Debug, Deserialize)]
struct ShrinkOutput {
    #[serde(default)]
    url: Option<String>,
}

/// TinyPNG API client
#[derive(Debug, Clone)]
pub struct TinyPngClient {
    client: Client,
    base_url: String,
}

impl TinyPngClient {
    /// Create a client for `base_url` (normally `https://api.tinify.com`)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| {
                LayerExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Compress one image with `api_key`
    ///
    /// # Errors
    ///
    /// - [`ShrinkError::Upstream`] when the shrink call does not answer `201`
    /// - [`ShrinkError::MissingOutputUrl`] when the answer has no output location
    /// - [`ShrinkError::Transport`] for network failures or a failed download
    pub async fn shrink(
        &self,
        api_key: &str,
        image: Vec<u8>,
    ) -> std::result::Result<Vec<u8>, ShrinkError> {
        let input_bytes = image.len();
        let response = self
            .client
            .post(format!("{}/shrink", self.base_url))
            .basic_auth("api", Some(api_key))
            .body(image)
            .send()
            .await
            .map_err(|e| ShrinkError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let text = response.text().await.unwrap_or_default();
            let message = if text.is_empty() {
                "TinyPNG error".to_string()
            } else {
                text
            };
            return Err(ShrinkError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body: ShrinkResponse = response
            .json()
            .await
            .map_err(|e| ShrinkError::Transport(e.to_string()))?;
        let output_url = body
            .output
            .and_then(|o| o.url)
            .filter(|u| !u.is_empty())
            .ok_or(ShrinkError::MissingOutputUrl)?;

        let compressed = self
            .client
            .get(&output_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ShrinkError::Transport(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| ShrinkError::Transport(e.to_string()))?;

        tracing::info!(
            input_bytes,
            output_bytes = compressed.len(),
            "Image compressed"
        );
        Ok(compressed.to_vec())
    }
}
