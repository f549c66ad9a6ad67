//! Result type alias for layer-export
//!
//! This module provides a convenient Result type alias that uses
//! `LayerExportError` as the error type.

use super::errors::LayerExportError;

/// Result type alias for layer-export operations
///
/// # Examples
///
/// ```
/// use layer_export::domain::result::Result;
/// use layer_export::domain::errors::LayerExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LayerExportError::Export("render failed".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LayerExportError>;
