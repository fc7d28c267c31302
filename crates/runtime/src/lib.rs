//! Session orchestration around the deterministic tile engine.
//!
//! This crate wires the pure `tile-core` reducer into a playable session: a
//! command queue that respects animation, a single-slot snapshot repository,
//! and a batching telemetry queue with pluggable delivery sinks.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session store that front-ends drive
//! - [`repository`] persists the resumable snapshot and the best score
//! - [`telemetry`] batches engine payloads and delivers them off the hot path
//! - [`config`] reads runtime configuration from the environment
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod telemetry;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use repository::{
    FileSnapshotRepository, InMemorySnapshotRepository, RepositoryError, SnapshotRepository,
};
pub use session::{GestureMetadata, LastGesture, RestartSource, Session};
pub use telemetry::{
    JsonLinesSink, MemorySink, SessionRestartPayload, TelemetryBatch, TelemetryError,
    TelemetryQueue, TelemetryRecord, TelemetrySink,
};
