//! Batch export-and-compress pipeline
//!
//! Walks the selection strictly in order, one export call and at most one
//! compression call in flight at a time, and streams the outcome through the
//! delivery channel as it is produced.

use crate::adapters::traits::{Compressor, NodeExporter};
use crate::core::delivery::{self, DeliveryReceiver, DeliverySender};
use crate::core::export::naming::{build_name, NameTag};
use crate::core::export::validator::validate;
use crate::core::settings::SettingsManager;
use crate::domain::{
    ExportOptions, ExportRequest, ExportedArtifact, LayerExportError, PipelineEvent, Result,
    SelectableNode,
};
use crate::{log_batch_progress, log_error_with_context, log_item_exported};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

/// Default number of events buffered between the pipeline and its consumer
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Outcome of one selected item
enum ItemOutcome {
    Continue,
    Abort,
}

/// Batch pipeline
///
/// Only one batch runs at a time; [`start`](Self::start) rejects a second
/// request until the first one has emitted its terminal event.
///
/// # Example
///
/// ```rust,no_run
/// use layer_export::core::export::BatchPipeline;
/// use layer_export::domain::ExportRequest;
///
/// # async fn example(pipeline: BatchPipeline, request: ExportRequest) -> layer_export::domain::Result<()> {
/// let mut events = pipeline.start(request)?;
/// while let Some(event) = events.recv().await {
///     println!("{event:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BatchPipeline {
    exporter: Arc<dyn NodeExporter>,
    compressor: Arc<dyn Compressor>,
    settings: Arc<SettingsManager>,
    busy: Arc<Mutex<()>>,
    channel_capacity: usize,
}

impl BatchPipeline {
    /// Create a new pipeline over its collaborators
    pub fn new(
        exporter: Arc<dyn NodeExporter>,
        compressor: Arc<dyn Compressor>,
        settings: Arc<SettingsManager>,
    ) -> Self {
        Self {
            exporter,
            compressor,
            settings,
            busy: Arc::new(Mutex::new(())),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the delivery channel capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Whether a batch is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.try_lock().is_err()
    }

    /// Start a batch in the background and return its event stream
    ///
    /// # Errors
    ///
    /// Returns [`LayerExportError::BatchInProgress`] if another batch has not
    /// finished yet.
    pub fn start(&self, request: ExportRequest) -> Result<DeliveryReceiver> {
        let guard = self
            .busy
            .clone()
            .try_lock_owned()
            .map_err(|_| LayerExportError::BatchInProgress)?;

        let (tx, rx) = delivery::channel(self.channel_capacity);
        let worker = self.clone();

        tokio::spawn(async move {
            worker.run(request, &tx).await;
            // Release before closing the stream so a consumer that saw the
            // end can immediately start the next batch.
            drop(guard);
            drop(tx);
        });

        Ok(rx)
    }

    /// Start a batch and wait for every event
    ///
    /// # Errors
    ///
    /// Returns [`LayerExportError::BatchInProgress`] if another batch is
    /// running.
    pub async fn run_to_completion(&self, request: ExportRequest) -> Result<Vec<PipelineEvent>> {
        Ok(self.start(request)?.collect().await)
    }

    async fn run(&self, request: ExportRequest, events: &DeliverySender) {
        let batch_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "batch",
            batch_id = %batch_id,
            items = request.items.len()
        );
        self.execute(request, events).instrument(span).await;
    }

    async fn execute(&self, request: ExportRequest, events: &DeliverySender) {
        if request.items.is_empty() {
            tracing::warn!("Download requested with an empty selection");
            events.emit(PipelineEvent::Fatal("no selection".to_string())).await;
            return;
        }

        let options = match validate(request.scale.as_deref(), request.format.as_deref()) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected export options");
                events.emit(PipelineEvent::Fatal(e.to_string())).await;
                return;
            }
        };

        let endpoint = request.endpoint();
        if let Some(endpoint) = endpoint {
            if let Err(e) = self.settings.remember_compress_url(endpoint).await {
                tracing::warn!(error = %e, "Failed to remember compression URL");
            }
        }

        let compressed_only = request.effective_compressed_only();
        let prefix = request.prefix();

        tracing::info!(
            scale = options.scale.get(),
            format = %options.format,
            compression = endpoint.is_some(),
            compressed_only,
            "Starting batch"
        );

        let total = request.items.len();
        for (index, item) in request.items.iter().enumerate() {
            log_batch_progress!(index + 1, total);

            let outcome = self
                .process_item(item, &options, endpoint, prefix, compressed_only, events)
                .await;
            if let ItemOutcome::Abort = outcome {
                return;
            }
        }

        events.emit(PipelineEvent::Done).await;
    }

    async fn process_item(
        &self,
        item: &SelectableNode,
        options: &ExportOptions,
        endpoint: Option<&str>,
        prefix: Option<&str>,
        compressed_only: bool,
        events: &DeliverySender,
    ) -> ItemOutcome {
        if !item.supports_export() {
            tracing::info!(node_id = %item.id, name = %item.name, "Skipping unsupported node");
            events
                .emit(PipelineEvent::Warning(format!(
                    "{} cannot be exported",
                    item.name
                )))
                .await;
            return ItemOutcome::Continue;
        }

        let bytes: Arc<[u8]> = match self.exporter.export_node(item, options).await {
            Ok(bytes) => bytes.into(),
            Err(e) => {
                log_error_with_context!(&e, "Export capability failed, aborting batch");
                events
                    .emit(PipelineEvent::Fatal(format!("export failed: {e}")))
                    .await;
                return ItemOutcome::Abort;
            }
        };

        let ext = options.format.extension();
        let base_name = build_name(&item.id, options.scale, ext, prefix, NameTag::Base);

        if !compressed_only {
            log_item_exported!(base_name, bytes.len());
            events
                .emit(PipelineEvent::Artifact(ExportedArtifact::new(
                    bytes.clone(),
                    base_name.clone(),
                )))
                .await;
        }

        let Some(endpoint) = endpoint else {
            return ItemOutcome::Continue;
        };

        match self.compressor.compress(&bytes, Some(endpoint)).await {
            Ok(Some(compressed)) if !compressed.is_empty() => {
                let name = if compressed_only {
                    base_name
                } else {
                    build_name(&item.id, options.scale, ext, prefix, NameTag::Compressed)
                };
                log_item_exported!(name, compressed.len());
                events
                    .emit(PipelineEvent::Artifact(ExportedArtifact::new(compressed, name)))
                    .await;
            }
            Ok(_) => {
                tracing::debug!(node_id = %item.id, "Compression service returned no output");
            }
            Err(e) => {
                tracing::warn!(node_id = %item.id, error = %e, "Compression failed");
                let message = if compressed_only {
                    format!("compression failed: {e}")
                } else {
                    format!("compression failed (original delivered): {e}")
                };
                events.emit(PipelineEvent::Warning(message)).await;
            }
        }

        ItemOutcome::Continue
    }
}
