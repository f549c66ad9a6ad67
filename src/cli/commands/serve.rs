//! Serve-compress command implementation
//!
//! Runs the local compression service until a shutdown signal arrives.

use super::exit_code_for;
use crate::config::load_config_or_default;
use crate::server;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the serve-compress command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on (defaults to server.bind_address)
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve-compress command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if let Some(bind) = &self.bind {
            tracing::info!(bind = %bind, "Overriding bind address from CLI");
            config.server.bind_address = bind.clone();
        }

        println!(
            "🗜️  Compression service on http://{}/compress",
            config.server.bind_address
        );

        match server::serve(&config.server, shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Compression service failed");
                eprintln!("Compression service failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
