//! UI message host
//!
//! Dispatches inbound [`UiMessage`]s against the selection source, the batch
//! pipeline and the settings manager, and writes [`PluginMessage`]s to an
//! outbound channel in the order they are produced.

use crate::adapters::traits::SelectionSource;
use crate::core::delivery::{DownloadMessage, PluginMessage, UiMessage};
use crate::core::export::BatchPipeline;
use crate::core::settings::SettingsManager;
use crate::domain::{LayerExportError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message host
pub struct MessageHost {
    selection: Arc<dyn SelectionSource>,
    pipeline: BatchPipeline,
    settings: Arc<SettingsManager>,
    outbound: mpsc::Sender<PluginMessage>,
}

impl MessageHost {
    /// Create a host writing replies to `outbound`
    pub fn new(
        selection: Arc<dyn SelectionSource>,
        pipeline: BatchPipeline,
        settings: Arc<SettingsManager>,
        outbound: mpsc::Sender<PluginMessage>,
    ) -> Self {
        Self {
            selection,
            pipeline,
            settings,
            outbound,
        }
    }

    /// Handle one raw JSON message
    ///
    /// Unparseable input is answered with an `error` message.
    pub async fn handle_json(&self, raw: &str) -> Result<Option<JoinHandle<()>>> {
        match serde_json::from_str::<UiMessage>(raw) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed UI message");
                self.send(PluginMessage::Error {
                    message: format!("invalid message: {e}"),
                })
                .await?;
                Ok(None)
            }
        }
    }

    /// Handle one message
    ///
    /// A `download` starts a batch and returns the task forwarding its events;
    /// the call itself does not wait for the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the outbound channel is closed.
    pub async fn handle(&self, message: UiMessage) -> Result<Option<JoinHandle<()>>> {
        match message {
            UiMessage::GetConfig => {
                let compress_service_url = self.settings.get_config().await;
                self.send(PluginMessage::Init {
                    compress_service_url,
                })
                .await?;
                Ok(None)
            }
            UiMessage::Download(download) => self.download(download).await,
        }
    }

    /// Process messages until the inbound channel closes, then wait for the
    /// last batch to finish forwarding
    pub async fn run(self, mut inbound: mpsc::Receiver<UiMessage>) -> Result<()> {
        let mut last = None;
        while let Some(message) = inbound.recv().await {
            if let Some(handle) = self.handle(message).await? {
                last = Some(handle);
            }
        }

        if let Some(handle) = last {
            handle
                .await
                .map_err(|e| LayerExportError::Other(format!("Forwarding task failed: {e}")))?;
        }
        Ok(())
    }

    async fn download(&self, download: DownloadMessage) -> Result<Option<JoinHandle<()>>> {
        let items = match self.selection.current_selection().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read selection");
                self.send(PluginMessage::Error {
                    message: e.to_string(),
                })
                .await?;
                return Ok(None);
            }
        };

        let mut events = match self.pipeline.start(download.into_request(items)) {
            Ok(events) => events,
            Err(e @ LayerExportError::BatchInProgress) => {
                tracing::warn!("Download rejected, a batch is already running");
                self.send(PluginMessage::Error {
                    message: e.to_string(),
                })
                .await?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let outbound = self.outbound.clone();
        Ok(Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let terminal = event.is_terminal();
                if outbound.send(PluginMessage::from(&event)).await.is_err() {
                    tracing::warn!("UI disconnected during batch");
                    break;
                }
                if terminal {
                    break;
                }
            }
        })))
    }

    async fn send(&self, message: PluginMessage) -> Result<()> {
        self.outbound
            .send(message)
            .await
            .map_err(|_| LayerExportError::Delivery("UI channel closed".to_string()))
    }
}
