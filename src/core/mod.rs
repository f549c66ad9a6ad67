//! Core business logic for layer-export.
//!
//! # Modules
//!
//! - [`export`] - Validation, naming, the batch pipeline and summaries
//! - [`delivery`] - Ordered event channel and the UI wire protocol
//! - [`settings`] - Remembered compression endpoint
//! - [`host`] - UI message dispatch
//!
//! # Batch Workflow
//!
//! 1. **Precondition**: Reject an empty selection or an unsupported format
//! 2. **Remember**: Persist the compression endpoint, if any
//! 3. **Export**: Rasterize each supported item in selection order
//! 4. **Compress** (optional): Send each image to the compression service
//! 5. **Deliver**: Stream artifacts and warnings, then `Done`
//!
//! # Example
//!
//! ```rust,no_run
//! use layer_export::adapters::compress::HttpCompressionClient;
//! use layer_export::adapters::settings::MemorySettingsStore;
//! use layer_export::adapters::traits::NodeExporter;
//! use layer_export::core::export::BatchPipeline;
//! use layer_export::core::settings::{SettingsManager, DEFAULT_COMPRESS_SERVICE_URL};
//! use layer_export::domain::ExportRequest;
//! use std::sync::Arc;
//!
//! # async fn example(exporter: Arc<dyn NodeExporter>, request: ExportRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Arc::new(SettingsManager::new(
//!     Arc::new(MemorySettingsStore::new()),
//!     DEFAULT_COMPRESS_SERVICE_URL,
//! ));
//! let pipeline = BatchPipeline::new(
//!     exporter,
//!     Arc::new(HttpCompressionClient::new(60)?),
//!     settings,
//! );
//!
//! let events = pipeline.run_to_completion(request).await?;
//! println!("{} events", events.len());
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod export;
pub mod host;
pub mod settings;
