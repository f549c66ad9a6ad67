//! Figma REST API adapter
//!
//! - [`FigmaClient`] implements [`NodeExporter`](crate::adapters::traits::NodeExporter)
//!   through the images endpoint
//! - [`NodeListSelection`] implements
//!   [`SelectionSource`](crate::adapters::traits::SelectionSource) for a fixed id list
//! - [`parse_figma_url`] turns share links into a file key and node id

pub mod client;
pub mod link;
pub mod models;
pub mod selection;

pub use client::FigmaClient;
pub use link::parse_figma_url;
pub use selection::NodeListSelection;
