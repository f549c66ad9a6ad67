//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - Configurable log levels
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use layer_export::logging::init_logging;
//! use layer_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log one artifact leaving the pipeline
///
/// # Example
///
/// ```no_run
/// use layer_export::log_item_exported;
///
/// log_item_exported!("1_2@3x.png", 2048usize);
/// ```
#[macro_export]
macro_rules! log_item_exported {
    ($name:expr, $bytes:expr) => {
        tracing::info!(
            name = %$name,
            bytes = $bytes,
            "Artifact emitted"
        );
    };
}

/// Log progress through the selection
///
/// # Example
///
/// ```no_run
/// use layer_export::log_batch_progress;
///
/// log_batch_progress!(3, 12);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing item"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use layer_export::log_error_with_context;
/// use layer_export::domain::LayerExportError;
///
/// let error = LayerExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::LayerExportError;

    #[test]
    fn test_macros_expand() {
        let error = LayerExportError::Delivery("disk full".to_string());
        log_item_exported!("a@3x.png", 10usize);
        log_batch_progress!(1usize, 4usize);
        log_error_with_context!(&error, "Failed to store artifact");
    }
}
