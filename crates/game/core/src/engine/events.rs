//! Ordered, replayable engine event log.

use crate::state::{Position, TileId};

/// Reason attached to every rejected move.
pub const NO_EFFECT_REASON: &str = "Move results in no tile shifts or merges";

/// Something that happened to the board during one move.
///
/// For a single move, events are grouped per traversed line (all
/// [`TileMoved`](Self::TileMoved) then all [`TileMerged`](Self::TileMerged)),
/// followed by at most one spawn and at most one game over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all_fields = "camelCase")
)]
pub enum EngineEvent {
    TileMoved {
        id: TileId,
        from: Position,
        to: Position,
    },
    TileMerged {
        target_id: TileId,
        consumed_ids: (TileId, TileId),
        value: u32,
        score_delta: u64,
    },
    TileSpawned {
        id: TileId,
        value: u32,
        position: Position,
    },
    MoveRejected {
        reason: String,
    },
    GameOver {
        board_hash: String,
    },
}

impl EngineEvent {
    pub fn rejected() -> Self {
        Self::MoveRejected {
            reason: NO_EFFECT_REASON.to_string(),
        }
    }

    /// Short label for logs and status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TileMoved { .. } => "TileMoved",
            Self::TileMerged { .. } => "TileMerged",
            Self::TileSpawned { .. } => "TileSpawned",
            Self::MoveRejected { .. } => "MoveRejected",
            Self::GameOver { .. } => "GameOver",
        }
    }
}
