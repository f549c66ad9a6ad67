//! Configuration schema types
//!
//! Every section has serde defaults so an empty file (or no file at all) is a
//! usable configuration.

use crate::config::SecretString;
use crate::core::settings::DEFAULT_COMPRESS_SERVICE_URL;
use crate::domain::{ExportFormat, Scale};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main layer-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Design-tool REST API access
    #[serde(default)]
    pub figma: FigmaConfig,

    /// Batch defaults and output location
    #[serde(default)]
    pub export: ExportConfig,

    /// Compression client settings
    #[serde(default)]
    pub compression: CompressionConfig,

    /// Local compression service
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.figma.validate()?;
        self.export.validate()?;
        self.compression.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Design-tool REST API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigmaConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_figma_api_base_url")]
    pub api_base_url: String,

    /// Personal access token sent as `X-Figma-Token`
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// File used when the command line names none
    #[serde(default)]
    pub file_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_figma_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl FigmaConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err("figma.api_base_url must start with http:// or https://".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("figma.timeout_seconds must be > 0".to_string());
        }
        if let Some(key) = &self.file_key {
            if key.trim().is_empty() || key.contains('/') {
                return Err(format!("figma.file_key '{key}' is not a valid file key"));
            }
        }
        Ok(())
    }

    /// Whether a non-empty access token is configured
    pub fn has_access_token(&self) -> bool {
        crate::config::exposed(self.access_token.as_ref()).is_some()
    }
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_figma_api_base_url(),
            access_token: None,
            file_key: None,
            timeout_seconds: default_figma_timeout_seconds(),
        }
    }
}

/// Export defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Scale used when the command line gives none
    #[serde(default = "default_scale")]
    pub default_scale: u8,

    /// Format used when the command line gives none
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Directory receiving artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Path segment prepended to every artifact name
    #[serde(default)]
    pub output_prefix: Option<String>,

    /// Events buffered between the pipeline and the sink
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if !(Scale::MIN..=Scale::MAX).contains(&self.default_scale) {
            return Err(format!(
                "export.default_scale must be between {} and {}, got {}",
                Scale::MIN,
                Scale::MAX,
                self.default_scale
            ));
        }
        if ExportFormat::from_upper(&self.default_format.to_uppercase()).is_none() {
            return Err(format!(
                "Invalid export.default_format '{}'. Must be one of: PNG, JPG",
                self.default_format
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.channel_capacity == 0 || self.channel_capacity > 1024 {
            return Err(format!(
                "export.channel_capacity must be between 1 and 1024, got {}",
                self.channel_capacity
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_scale: default_scale(),
            default_format: default_format(),
            output_dir: default_output_dir(),
            output_prefix: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Compression client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Endpoint offered when none was ever remembered
    #[serde(default = "default_service_url")]
    pub default_service_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_compression_timeout_seconds")]
    pub timeout_seconds: u64,

    /// JSON document holding the remembered endpoint
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl CompressionConfig {
    fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.default_service_url).map_err(|e| {
            format!(
                "compression.default_service_url '{}' is not a valid URL: {e}",
                self.default_service_url
            )
        })?;
        if self.timeout_seconds == 0 {
            return Err("compression.timeout_seconds must be > 0".to_string());
        }
        if self.settings_path.trim().is_empty() {
            return Err("compression.settings_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_service_url: default_service_url(),
            timeout_seconds: default_compression_timeout_seconds(),
            settings_path: default_settings_path(),
        }
    }
}

/// Local compression service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TinyPNG API key; `TINYPNG_API_KEY` is used when unset
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub tinypng_api_key: Option<SecretString>,

    /// TinyPNG API base URL
    #[serde(default = "default_tinypng_base_url")]
    pub tinypng_base_url: String,

    /// Upstream request timeout in seconds
    #[serde(default = "default_server_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ServerConfig {
    fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if !self.tinypng_base_url.starts_with("http://")
            && !self.tinypng_base_url.starts_with("https://")
        {
            return Err("server.tinypng_base_url must start with http:// or https://".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("server.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.bind_address.parse().map_err(|e| {
            format!(
                "server.bind_address '{}' is not a valid socket address: {e}",
                self.bind_address
            )
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tinypng_api_key: None,
            tinypng_base_url: default_tinypng_base_url(),
            timeout_seconds: default_server_timeout_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Validates the logging section
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation strategy is unknown or the path is empty
    /// while file logging is enabled.
    pub fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_figma_api_base_url() -> String {
    "https://api.figma.com/v1".to_string()
}

fn default_figma_timeout_seconds() -> u64 {
    60
}

fn default_scale() -> u8 {
    Scale::DEFAULT.get()
}

fn default_format() -> String {
    ExportFormat::Png.as_str().to_string()
}

fn default_output_dir() -> String {
    "./exports".to_string()
}

fn default_channel_capacity() -> usize {
    crate::core::export::DEFAULT_CHANNEL_CAPACITY
}

fn default_service_url() -> String {
    DEFAULT_COMPRESS_SERVICE_URL.to_string()
}

fn default_compression_timeout_seconds() -> u64 {
    60
}

fn default_settings_path() -> String {
    "./.layer-export/settings.json".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1:8765".to_string()
}

fn default_tinypng_base_url() -> String {
    "https://api.tinify.com".to_string()
}

fn default_server_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.export.default_scale, 3);
        assert_eq!(config.export.default_format, "PNG");
        assert_eq!(
            config.compression.default_service_url,
            "http://localhost:8765/compress"
        );
        assert_eq!(config.server.bind_address, "127.0.0.1:8765");
        assert!(!config.figma.has_access_token());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.figma.api_base_url, "https://api.figma.com/v1");
        assert_eq!(config.server.tinypng_base_url, "https://api.tinify.com");
        assert_eq!(config.logging.local_rotation, "daily");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().unwrap_err().contains("log_level"));
    }

    #[test]
    fn test_invalid_default_scale() {
        let mut config = AppConfig::default();
        config.export.default_scale = 5;
        assert!(config.validate().unwrap_err().contains("default_scale"));
    }

    #[test]
    fn test_default_format_case_insensitive() {
        let mut config = AppConfig::default();
        config.export.default_format = "jpg".to_string();
        assert!(config.validate().is_ok());

        config.export.default_format = "webp".to_string();
        assert!(config.validate().unwrap_err().contains("default_format"));
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = AppConfig::default();
        config.server.bind_address = "localhost".to_string();
        assert!(config.validate().unwrap_err().contains("bind_address"));
    }

    #[test]
    fn test_invalid_service_url() {
        let mut config = AppConfig::default();
        config.compression.default_service_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_file_key() {
        let mut config = AppConfig::default();
        config.figma.file_key = Some("a/b".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_access_token_presence() {
        let mut config = FigmaConfig::default();
        config.access_token = Some(crate::config::secret_string(String::new()));
        assert!(!config.has_access_token());

        config.access_token = Some(crate::config::secret_string("figd_abc".to_string()));
        assert!(config.has_access_token());
    }
}
