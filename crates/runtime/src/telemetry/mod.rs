//! Telemetry batching and delivery.
//!
//! The engine produces flat [`tile_core::TelemetryPayload`] records; the
//! session adds restart records. Both flow through a [`TelemetryQueue`] that
//! batches them and hands each batch to a [`TelemetrySink`].

mod queue;
mod record;
mod sink;

pub use queue::TelemetryQueue;
pub use record::{RestartEvent, RestartSource, SessionRestartPayload, TelemetryBatch, TelemetryRecord};
pub use sink::{JsonLinesSink, MemorySink, TelemetrySink};

use thiserror::Error;

/// Errors raised while delivering telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sink rejected batch of {size} records: {reason}")]
    Rejected { size: usize, reason: String },
}
