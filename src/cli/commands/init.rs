//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "layer-export.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing layer-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Create a personal access token in Figma");
                println!("  2. Put it in a .env file as FIGMA_ACCESS_TOKEN=...");
                println!("  3. Optionally set TINYPNG_API_KEY for serve-compress");
                println!("  4. Validate configuration: layer-export validate-config");
                println!("  5. Export: layer-export export --url <figma layer link>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# layer-export configuration

[application]
log_level = "info"

[figma]
access_token = "${FIGMA_ACCESS_TOKEN}"
# file_key = "AbC123"

[export]
default_scale = 3
default_format = "PNG"
output_dir = "./exports"

[compression]
default_service_url = "http://localhost:8765/compress"
settings_path = "./.layer-export/settings.json"

[server]
bind_address = "127.0.0.1:8765"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# layer-export configuration
#
# Every value can also be set through LAYER_EXPORT_<SECTION>_<KEY>, e.g.
# LAYER_EXPORT_EXPORT_OUTPUT_DIR=./out. ${VAR} placeholders are replaced
# with environment variables when the file is loaded.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Figma REST API
# ============================================================================
[figma]
# API root
api_base_url = "https://api.figma.com/v1"

# Personal access token (use an environment variable)
access_token = "${FIGMA_ACCESS_TOKEN}"

# Default design file; share links passed with --url carry their own
# file_key = "AbC123"

# Request timeout in seconds
timeout_seconds = 60

# ============================================================================
# Export Defaults
# ============================================================================
[export]
# Scale used when none is given (1-4)
default_scale = 3

# PNG or JPG
default_format = "PNG"

# Directory artifacts are written to
output_dir = "./exports"

# Sub-directory prepended to every artifact name
# output_prefix = "icons"

# Events buffered between the pipeline and the writer (1-1024)
channel_capacity = 16

# ============================================================================
# Compression Service Client
# ============================================================================
[compression]
# Offered when no URL has been remembered yet
default_service_url = "http://localhost:8765/compress"

# Request timeout in seconds
timeout_seconds = 60

# Where the last used service URL is remembered
settings_path = "./.layer-export/settings.json"

# ============================================================================
# Local Compression Service (serve-compress)
# ============================================================================
[server]
bind_address = "127.0.0.1:8765"

# Falls back to the TINYPNG_API_KEY environment variable
# tinypng_api_key = "${TINYPNG_API_KEY}"

tinypng_base_url = "https://api.tinify.com"
timeout_seconds = 30

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# JSON log files in addition to the console
local_enabled = false

# Log directory
local_path = "./logs"

# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn parse(template: &str) -> AppConfig {
        let contents = template.replace("${FIGMA_ACCESS_TOKEN}", "figd_test");
        toml::from_str(&contents).unwrap()
    }

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "layer-export.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "layer-export.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generate_minimal_config() {
        let config = parse(&InitArgs::generate_minimal_config());
        assert!(config.validate().is_ok());
        assert!(config.figma.has_access_token());
        assert_eq!(config.export.default_scale, 3);
    }

    #[test]
    fn test_generate_config_with_examples() {
        let template = InitArgs::generate_config_with_examples();
        assert!(template.contains("LAYER_EXPORT_<SECTION>_<KEY>"));

        let config = parse(&template);
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address, "127.0.0.1:8765");
    }

    #[tokio::test]
    async fn test_execute_refuses_to_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("layer-export.toml");
        fs::write(&path, "# existing").unwrap();

        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# existing");
    }
}
