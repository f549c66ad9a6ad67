//! Session command implementation
//!
//! Speaks the UI message protocol over stdin/stdout: one JSON message per
//! line in each direction. The layers named on the command line stand in for
//! the live selection and are re-resolved on every `download`.

use super::{exit_code_for, SelectionArgs, Workspace};
use crate::config::load_config_or_default;
use crate::core::delivery::PluginMessage;
use crate::core::host::MessageHost;
use crate::domain::{LayerExportError, Result};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, watch};

/// Outbound messages buffered ahead of the writer
const OUTBOUND_CAPACITY: usize = 64;

/// Arguments for the session command
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
}

impl SessionArgs {
    /// Execute the session command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let workspace = match Workspace::build(&config, &self.selection) {
            Ok(w) => w,
            Err(e) => {
                eprintln!("Failed to start session: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let host = MessageHost::new(
            workspace.selection,
            workspace.pipeline,
            workspace.settings,
            tx,
        );

        tracing::info!(
            file_key = %workspace.client.file_key(),
            "Session started, reading messages from stdin"
        );

        let input = BufReader::new(tokio::io::stdin());
        let mut output = tokio::io::stdout();
        match run_session(host, rx, input, &mut output, shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Session failed");
                eprintln!("Session failed: {e}");
                Ok(5)
            }
        }
    }
}

/// Pump messages between a line-oriented transport and a [`MessageHost`]
///
/// Returns once the input ends (or `shutdown` turns true) and every started
/// batch has been forwarded and written.
///
/// # Errors
///
/// Returns an error if the transport fails.
pub async fn run_session<R, W>(
    host: MessageHost,
    mut outbound: mpsc::Receiver<PluginMessage>,
    input: R,
    output: &mut W,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let read = async move {
        let mut lines = input.lines();
        let mut last = None;

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                Ok(()) = shutdown.changed() => {
                    tracing::info!("Session interrupted");
                    break;
                }
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if let Some(handle) = host.handle_json(&line).await? {
                last = Some(handle);
            }
        }

        if let Some(handle) = last {
            handle
                .await
                .map_err(|e| LayerExportError::Other(format!("Forwarding task failed: {e}")))?;
        }
        drop(host);
        Ok::<(), LayerExportError>(())
    };

    let write = async {
        while let Some(message) = outbound.recv().await {
            let mut line = serde_json::to_vec(&message)?;
            line.push(b'\n');
            output.write_all(&line).await?;
            output.flush().await?;
        }
        Ok::<(), LayerExportError>(())
    };

    let (read, write) = tokio::join!(read, write);
    read?;
    write
}
