//! Export command implementation
//!
//! This module implements the `export` command: resolve the selected layers,
//! run one batch and write every artifact below the output directory.

use super::{exit_code_for, SelectionArgs, Workspace};
use crate::adapters::sink::FileSink;
use crate::adapters::traits::SelectionSource;
use crate::config::{load_config_or_default, AppConfig};
use crate::core::export::BatchSummary;
use crate::domain::{ExportRequest, PipelineEvent, SelectableNode};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Export scale, 1 to 4 (defaults to export.default_scale)
    #[arg(short, long)]
    pub scale: Option<String>,

    /// Output format, PNG or JPG (defaults to export.default_format)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Prefix prepended to every artifact name, e.g. "icons/"
    #[arg(long)]
    pub output_path: Option<String>,

    /// Directory artifacts are written to (defaults to export.output_dir)
    #[arg(short = 'o', long)]
    pub output_dir: Option<String>,

    /// Compression service URL for this batch
    #[arg(long, conflicts_with = "compress")]
    pub compress_url: Option<String>,

    /// Compress with the remembered compression service URL
    #[arg(long)]
    pub compress: bool,

    /// Keep only the compressed artifact of each layer
    #[arg(long)]
    pub only_compressed: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let workspace = match Workspace::build(&config, &self.selection) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let items = match workspace.selection.current_selection().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve selection");
                eprintln!("Failed to resolve selection: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let endpoint = match (&self.compress_url, self.compress) {
            (Some(url), _) => Some(url.clone()),
            (None, true) => Some(workspace.settings.get_config().await),
            (None, false) => None,
        };
        let request = self.build_request(&config, items, endpoint);

        let sink = FileSink::new(self.output_dir.as_deref().unwrap_or(&config.export.output_dir));
        println!(
            "🚀 Exporting {} layer(s) from {} to {}",
            request.items.len(),
            workspace.client.file_key(),
            sink.root().display()
        );
        println!();

        let events = match workspace.pipeline.start(request) {
            Ok(events) => events,
            Err(e) => {
                eprintln!("Export failed to start: {e}");
                return Ok(5);
            }
        };

        let drain = events.drain_into(&sink, report_event);
        let summary = tokio::select! {
            summary = drain => summary,
            Ok(()) = shutdown_signal.changed() => {
                println!();
                println!("⚠️  Export interrupted, artifacts written so far are kept.");
                tracing::info!("Export interrupted by user signal");
                return Ok(130);
            }
        };

        summary.log_summary();
        print_summary(&summary);
        Ok(summary.exit_code())
    }

    /// Combine arguments with configured defaults
    fn build_request(
        &self,
        config: &AppConfig,
        items: Vec<SelectableNode>,
        endpoint: Option<String>,
    ) -> ExportRequest {
        let mut request = ExportRequest::new(items)
            .with_scale(
                self.scale
                    .clone()
                    .unwrap_or_else(|| config.export.default_scale.to_string()),
            )
            .with_format(
                self.format
                    .clone()
                    .unwrap_or_else(|| config.export.default_format.clone()),
            )
            .compressed_only(self.only_compressed);

        if let Some(prefix) = self
            .output_path
            .as_ref()
            .or(config.export.output_prefix.as_ref())
        {
            request = request.with_output_prefix(prefix.clone());
        }
        if let Some(endpoint) = endpoint {
            request = request.with_compression_endpoint(endpoint);
        }
        request
    }
}

fn report_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::Artifact(artifact) => {
            println!("  ✓ {} ({} bytes)", artifact.name(), artifact.len());
        }
        PipelineEvent::Warning(message) => println!("  ⚠️  {message}"),
        PipelineEvent::Fatal(message) => eprintln!("❌ {message}"),
        PipelineEvent::Done => {}
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Artifacts: {}", summary.artifacts_delivered);
    println!("  Bytes: {}", summary.bytes_delivered);
    println!("  Warnings: {}", summary.warnings.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.fatal.is_some() {
        println!("❌ Export aborted");
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
    } else {
        println!("⚠️  Export completed with warnings");
    }
}
