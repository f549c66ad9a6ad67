//! Delivery channel
//!
//! A one-way, ordered stream of [`PipelineEvent`]s from a running batch to
//! its consumer. Events arrive in exactly the order the pipeline emitted
//! them; the stream ends after a terminal event (`Done` or `Fatal`).
//!
//! # Example
//!
//! ```rust
//! use layer_export::core::delivery;
//! use layer_export::domain::PipelineEvent;
//!
//! # async fn example() {
//! let (tx, rx) = delivery::channel(8);
//! tx.emit(PipelineEvent::Done).await;
//! drop(tx);
//! assert_eq!(rx.collect().await, vec![PipelineEvent::Done]);
//! # }
//! ```

pub mod wire;

use crate::adapters::traits::ArtifactSink;
use crate::core::export::summary::BatchSummary;
use crate::domain::PipelineEvent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub use wire::{DownloadMessage, PluginMessage, UiMessage};

/// Create a bounded delivery channel
pub fn channel(capacity: usize) -> (DeliverySender, DeliveryReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        DeliverySender {
            tx,
            closed: Arc::new(AtomicBool::new(false)),
        },
        DeliveryReceiver { rx },
    )
}

/// Producer half, owned by the pipeline
#[derive(Clone)]
pub struct DeliverySender {
    tx: mpsc::Sender<PipelineEvent>,
    closed: Arc<AtomicBool>,
}

impl DeliverySender {
    /// Push one event, waiting for capacity
    ///
    /// Returns `false` if the consumer has gone away. The batch is not
    /// cancelled in that case; later events are discarded.
    pub async fn emit(&self, event: PipelineEvent) -> bool {
        match self.tx.send(event).await {
            Ok(()) => true,
            Err(_) => {
                if !self.closed.swap(true, Ordering::Relaxed) {
                    tracing::warn!("Delivery receiver dropped, discarding remaining events");
                }
                false
            }
        }
    }
}

/// Consumer half
pub struct DeliveryReceiver {
    rx: mpsc::Receiver<PipelineEvent>,
}

impl DeliveryReceiver {
    /// Next event, `None` once the batch has finished
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        self.rx.recv().await
    }

    /// Collect every remaining event
    pub async fn collect(mut self) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.rx.recv().await {
            events.push(event);
        }
        events
    }

    /// Drain the stream into a sink, reporting every event to `observer`
    ///
    /// Sink failures are recorded in the summary as warnings and do not stop
    /// the drain.
    pub async fn drain_into<F>(mut self, sink: &dyn ArtifactSink, mut observer: F) -> BatchSummary
    where
        F: FnMut(&PipelineEvent),
    {
        let start = Instant::now();
        let mut summary = BatchSummary::new();

        while let Some(event) = self.rx.recv().await {
            observer(&event);
            if let PipelineEvent::Artifact(artifact) = &event {
                if let Err(e) = sink.deliver(artifact).await {
                    tracing::error!(
                        name = %artifact.name(),
                        error = %e,
                        "Failed to store artifact"
                    );
                    summary.record_sink_failure(artifact.name(), &e.to_string());
                    continue;
                }
            }
            summary.record(&event);
        }

        summary.with_duration(start.elapsed())
    }
}
