//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for layer-export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// layer-export - Batch exporter for design-tool layers
#[derive(Parser, Debug)]
#[command(name = "layer-export")]
#[command(version, about, long_about = None)]
#[command(author = "Layer Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "layer-export.toml",
        env = "LAYER_EXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LAYER_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the selected layers, optionally compressed
    Export(commands::export::ExportArgs),

    /// Print the remembered compression service URL
    GetConfig(commands::get_config::GetConfigArgs),

    /// Run the local compression service
    ServeCompress(commands::serve::ServeArgs),

    /// Exchange UI protocol messages over stdin/stdout
    Session(commands::session::SessionArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
