//! Compression service adapter
//!
//! Forwards exported images to an external HTTP compression service.

pub mod client;

pub use client::HttpCompressionClient;
