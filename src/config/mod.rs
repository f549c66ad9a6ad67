//! Configuration management for layer-export.
//!
//! # Overview
//!
//! layer-export uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LAYER_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use layer_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("layer-export.toml")?;
//!
//! println!("Figma API: {}", config.figma.api_base_url);
//! println!("Output: {}", config.export.output_dir);
//! println!("Compression: {}", config.compression.default_service_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`FigmaConfig`] - REST API base URL, access token, default file
//! - [`ExportConfig`] - Default scale and format, output location
//! - [`CompressionConfig`] - Default compression endpoint, settings file
//! - [`ServerConfig`] - Local compression service
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [figma]
//! access_token = "${FIGMA_TOKEN}"
//! file_key = "AbCdEf123456"
//!
//! [export]
//! default_scale = 3
//! default_format = "PNG"
//! output_dir = "./exports"
//!
//! [compression]
//! default_service_url = "http://localhost:8765/compress"
//!
//! [server]
//! bind_address = "127.0.0.1:8765"
//! tinypng_api_key = "${TINYPNG_API_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    AppConfig, ApplicationConfig, CompressionConfig, ExportConfig, FigmaConfig, LoggingConfig,
    ServerConfig,
};
pub use secret::{
    exposed, secret_from_env, secret_string, secret_string_opt, SecretString, SecretValue,
};
