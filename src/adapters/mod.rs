//! External system integrations
//!
//! - [`figma`] - Design-tool REST API (selection lookup and rendering)
//! - [`compress`] - Client for the HTTP compression service
//! - [`tinypng`] - TinyPNG client behind the local compression service
//! - [`settings`] - Settings storage backends
//! - [`sink`] - Artifact sinks
//! - [`traits`] - The seams the batch pipeline is written against
//!
//! # Design Pattern
//!
//! Adapters isolate third-party HTTP and filesystem access behind the traits
//! in [`traits`], so the pipeline can be tested with in-memory fakes.
//!
//! ```rust,no_run
//! use layer_export::adapters::figma::{FigmaClient, NodeListSelection};
//! use layer_export::config::FigmaConfig;
//! use layer_export::domain::{FileKey, NodeId};
//! use std::sync::Arc;
//!
//! # fn example(config: FigmaConfig) -> layer_export::domain::Result<()> {
//! let client = Arc::new(FigmaClient::new(&config, FileKey::new("AbC123").unwrap())?);
//! let selection = NodeListSelection::new(client, vec![NodeId::new("1:2").unwrap()]);
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod figma;
pub mod settings;
pub mod sink;
pub mod tinypng;
pub mod traits;
