//! Batch export orchestration
//!
//! This module provides the export logic for layer-export, including:
//! - Option validation ([`validate`])
//! - Deterministic artifact naming ([`build_name`])
//! - The batch pipeline ([`BatchPipeline`])
//! - Summary and reporting ([`BatchSummary`])

pub mod naming;
pub mod pipeline;
pub mod summary;
pub mod validator;

pub use naming::{build_name, NameTag};
pub use pipeline::{BatchPipeline, DEFAULT_CHANNEL_CAPACITY};
pub use summary::BatchSummary;
pub use validator::validate;
