//! # layer-export
//!
//! Batch exporter for design-tool layers. Each selected layer is rendered as
//! PNG or JPG at a chosen scale, optionally sent through an HTTP compression
//! service, and delivered as named artifacts in selection order.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Validating** download requests (format, scale)
//! - **Naming** artifacts deterministically (`<id>@<scale>x[_compress].<ext>`)
//! - **Exporting** layers one at a time through the Figma REST API
//! - **Compressing** exported images through a compression service
//! - **Delivering** an ordered stream of artifacts, warnings and a terminal event
//! - **Serving** a local TinyPNG-backed compression endpoint
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (pipeline, delivery, message host, settings)
//! - [`adapters`] - External integrations (Figma, compression, settings, files)
//! - [`server`] - Local compression service
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layer_export::adapters::compress::HttpCompressionClient;
//! use layer_export::adapters::figma::FigmaClient;
//! use layer_export::adapters::settings::MemorySettingsStore;
//! use layer_export::config::load_config_or_default;
//! use layer_export::core::export::BatchPipeline;
//! use layer_export::core::settings::SettingsManager;
//! use layer_export::domain::{ExportRequest, FileKey, NodeId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("layer-export.toml")?;
//!     let client = Arc::new(FigmaClient::new(&config.figma, FileKey::new("AbC123")?)?);
//!     let settings = Arc::new(SettingsManager::new(
//!         Arc::new(MemorySettingsStore::new()),
//!         &config.compression.default_service_url,
//!     ));
//!     let compressor = Arc::new(HttpCompressionClient::new(60)?);
//!     let pipeline = BatchPipeline::new(client.clone(), compressor, settings);
//!
//!     let items = client.resolve_selection(&[NodeId::new("12:34")?]).await?;
//!     let request = ExportRequest::new(items).with_scale("2");
//!
//!     for event in pipeline.run_to_completion(request).await? {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::LayerExportError`]. Failures inside a batch are not errors of
//! the call; they arrive on the event stream as warnings or a fatal event.
//!
//! ## Logging
//!
//! layer-export uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(node_id = "12:34", "Layer cannot be exported");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
