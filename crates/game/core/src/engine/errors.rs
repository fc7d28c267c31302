//! Error types for move resolution.

use crate::error::{ErrorSeverity, GameError};
use crate::rng::RngError;
use crate::state::{BoardError, Position};

/// Errors surfaced while resolving a move.
///
/// Rejected moves and game over are not errors; see
/// [`MoveOutcome`](super::MoveOutcome).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("random stream failed: {0}")]
    Rng(#[from] RngError),

    #[error("board update failed: {0}")]
    Board(#[from] BoardError),

    #[error("merging two {value} tiles at {position} exceeds the largest tile value")]
    ValueOverflow { value: u32, position: Position },
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Rng(err) => err.severity(),
            Self::Board(_) => ErrorSeverity::Internal,
            Self::ValueOverflow { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Rng(err) => err.error_code(),
            Self::Board(err) => err.error_code(),
            Self::ValueOverflow { .. } => "ENGINE_VALUE_OVERFLOW",
        }
    }
}
