//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the engine, repositories, and telemetry delivery so
//! clients can bubble them up with consistent context.
use thiserror::Error;

pub use crate::repository::RepositoryError;
pub use crate::telemetry::TelemetryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("move resolution failed")]
    Engine(#[source] tile_core::EngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl From<tile_core::EngineError> for RuntimeError {
    fn from(err: tile_core::EngineError) -> Self {
        Self::Engine(err)
    }
}
