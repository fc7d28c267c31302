//! Common error infrastructure for tile-core.
//!
//! Domain-specific errors (`RngError`, `BoardError`, `EngineError`) live next to
//! the code that raises them. This module provides the severity classification
//! and the [`GameError`] trait they all implement.
//!
//! Legitimate game outcomes (rejected moves, game over) are never errors; they
//! are reported through [`crate::engine::MoveOutcome`].

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input supplied by the caller; retrying without changes fails again.
    ///
    /// Examples: `next_int(0)`, a board row with the wrong length.
    Validation,

    /// Unexpected state inconsistency that indicates a bug.
    ///
    /// Examples: a tile whose stored coordinates disagree with its cell.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tile-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on who is at fault, not on impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and test assertions.
    fn error_code(&self) -> &'static str;
}
