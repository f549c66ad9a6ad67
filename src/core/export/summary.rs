//! Batch summary and reporting
//!
//! This module aggregates a delivered event stream into counts and messages
//! for the command-line report.

use crate::domain::PipelineEvent;
use std::time::Duration;

/// Summary of one batch as observed by its consumer
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of artifacts handed to the sink successfully
    pub artifacts_delivered: usize,

    /// Total payload size of delivered artifacts
    pub bytes_delivered: u64,

    /// Names of delivered artifacts, in delivery order
    pub delivered_names: Vec<String>,

    /// Recoverable problems (unsupported items, compression failures, sink failures)
    pub warnings: Vec<String>,

    /// Message of the fatal abort, if any
    pub fatal: Option<String>,

    /// Whether `Done` was received
    pub completed: bool,

    /// Wall-clock duration of the drain
    pub duration: Duration,
}

impl BatchSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold one event into the summary
    pub fn record(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Artifact(artifact) => {
                self.artifacts_delivered += 1;
                self.bytes_delivered += artifact.len() as u64;
                self.delivered_names.push(artifact.name().to_string());
            }
            PipelineEvent::Warning(message) => self.warnings.push(message.clone()),
            PipelineEvent::Fatal(message) => self.fatal = Some(message.clone()),
            PipelineEvent::Done => self.completed = true,
        }
    }

    /// Record an artifact the sink could not store
    pub fn record_sink_failure(&mut self, name: &str, error: &str) {
        self.warnings.push(format!("failed to save {name}: {error}"));
    }

    /// Build a summary from a complete event list
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a PipelineEvent>) -> Self {
        let mut summary = Self::new();
        for event in events {
            summary.record(event);
        }
        summary
    }

    /// Completed without any warning
    pub fn is_successful(&self) -> bool {
        self.completed && self.fatal.is_none() && self.warnings.is_empty()
    }

    /// Process exit code: 0 clean, 1 completed with warnings, 5 aborted
    pub fn exit_code(&self) -> i32 {
        if self.fatal.is_some() || !self.completed {
            5
        } else if self.warnings.is_empty() {
            0
        } else {
            1
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            artifacts = self.artifacts_delivered,
            bytes = self.bytes_delivered,
            warnings = self.warnings.len(),
            completed = self.completed,
            duration_ms = self.duration.as_millis() as u64,
            "Batch finished"
        );

        for warning in &self.warnings {
            tracing::warn!(message = %warning, "Batch warning");
        }
        if let Some(fatal) = &self.fatal {
            tracing::error!(message = %fatal, "Batch aborted");
        }
    }
}
