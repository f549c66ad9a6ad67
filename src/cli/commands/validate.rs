//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use crate::config::{load_config, AppConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Unlike the other commands a missing file is an error here.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after applying overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        for line in summary_lines(&config) {
            println!("{line}");
        }
        println!();
        Ok(0)
    }
}

fn summary_lines(config: &AppConfig) -> Vec<String> {
    let token = if config.figma.has_access_token() {
        "set"
    } else {
        "missing (export and session will fail)"
    };
    let tinypng = if config.server.tinypng_api_key.is_some() {
        "set"
    } else {
        "from TINYPNG_API_KEY"
    };

    vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Figma API: {}", config.figma.api_base_url),
        format!("  Figma Token: {token}"),
        format!(
            "  File Key: {}",
            config.figma.file_key.as_deref().unwrap_or("(from --url or --file-key)")
        ),
        format!(
            "  Defaults: {}x {}",
            config.export.default_scale, config.export.default_format
        ),
        format!("  Output Directory: {}", config.export.output_dir),
        format!(
            "  Compression Service: {}",
            config.compression.default_service_url
        ),
        format!("  Settings File: {}", config.compression.settings_path),
        format!("  Compression Server: {}", config.server.bind_address),
        format!("  TinyPNG Key: {tinypng}"),
    ]
}
