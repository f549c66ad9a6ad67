//! HTTP compression client
//!
//! Performs a single raw-binary POST per image. No retry, no content-type
//! negotiation, no JSON envelope.

use crate::adapters::traits::Compressor;
use crate::domain::{CompressionError, LayerExportError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Compression service client backed by reqwest
///
/// # Example
///
/// ```no_run
/// use layer_export::adapters::compress::HttpCompressionClient;
/// use layer_export::adapters::traits::Compressor;
///
/// # async fn example(png: Vec<u8>) -> layer_export::domain::Result<()> {
/// let client = HttpCompressionClient::new(60)?;
/// if let Some(smaller) = client
///     .compress(&png, Some("http://localhost:8765/compress"))
///     .await?
/// {
///     println!("{} -> {} bytes", png.len(), smaller.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpCompressionClient {
    client: Client,
}

impl HttpCompressionClient {
    /// Create a client whose requests give up after `timeout_seconds`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                LayerExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Compressor for HttpCompressionClient {
    async fn compress(
        &self,
        bytes: &[u8],
        endpoint: Option<&str>,
    ) -> std::result::Result<Option<Vec<u8>>, CompressionError> {
        let Some(endpoint) = endpoint.map(str::trim).filter(|e| !e.is_empty()) else {
            return Ok(None);
        };

        let url =
            Url::parse(endpoint).map_err(|e| CompressionError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        tracing::debug!(
            endpoint = %url,
            input_bytes = bytes.len(),
            "Sending image to compression service"
        );

        let response = self
            .client
            .post(url)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| CompressionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                "Compression service rejected request"
            );
            return Err(CompressionError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CompressionError::Transport(e.to_string()))?;

        tracing::debug!(
            input_bytes = bytes.len(),
            output_bytes = body.len(),
            "Compression service responded"
        );

        Ok(Some(body.to_vec()))
    }
}
