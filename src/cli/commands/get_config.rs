//! Get config command implementation
//!
//! Prints the remembered compression service URL, or the configured default
//! when nothing was remembered yet.

use super::settings_manager;
use crate::config::load_config_or_default;
use clap::Args;

/// Arguments for the get-config command
#[derive(Args, Debug)]
pub struct GetConfigArgs {}

impl GetConfigArgs {
    /// Execute the get-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let url = settings_manager(&config).get_config().await;
        tracing::debug!(url = %url, "Compression service URL");
        println!("{url}");
        Ok(0)
    }
}
