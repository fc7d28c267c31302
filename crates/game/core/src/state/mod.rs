//! Authoritative game state representation.
//!
//! [`GameState`] is created once per session (fresh or restored from a
//! snapshot) and transformed only through [`crate::engine::apply_move`], which
//! always returns a new value. Runtime layers clone or query this state but
//! never mutate the engine's input.
pub mod board;
pub mod hash;

pub use board::{Board, BoardError, BoardMatrix, Position, Tile, TileId, is_valid_tile_value};
pub use hash::board_hash;

use crate::action::MoveCommand;
use crate::config::GameConfig;
use crate::engine::detect_game_over;
use crate::rng::SeededPrng;
use crate::telemetry::Orientation;

/// Lifecycle status reported to front-ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EngineStatus {
    /// Waiting for input.
    #[default]
    Idle,
    /// A move was resolved and its transition is still being presented.
    Animating,
    /// No legal move remains.
    GameOver,
}

/// Canonical snapshot of the deterministic game state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameState {
    pub board: Board,
    pub score: u64,
    /// Highest score observed on this device, carried across restarts.
    pub best_score: u64,
    /// Number of accepted moves.
    pub move_count: u64,
    /// RNG seed for every random decision of the session.
    pub seed: String,
    /// Number of draws consumed from `seed` so far.
    ///
    /// `SeededPrng::new(seed, seed_cursor)` reproduces the next draw.
    pub seed_cursor: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pending_moves: Vec<MoveCommand>,
    /// Pre-move snapshots, newest last.
    #[cfg_attr(feature = "serde", serde(default))]
    pub undo_stack: Vec<SessionSnapshot>,
    pub status: EngineStatus,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub session_id: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub last_move_at: Option<i64>,
}

impl GameState {
    /// Creates an idle state over `board` with nothing consumed from `seed`.
    pub fn new(seed: impl Into<String>, board: Board) -> Self {
        Self {
            board,
            score: 0,
            best_score: 0,
            move_count: 0,
            seed: seed.into(),
            seed_cursor: 0,
            pending_moves: Vec::new(),
            undo_stack: Vec::new(),
            status: EngineStatus::Idle,
            session_id: None,
            last_move_at: None,
        }
    }

    /// Opening position: two 2-tiles at (0, 0) and (1, 1).
    ///
    /// The opening is fixed rather than drawn so that the first move of every
    /// session with the same seed consumes the same draws.
    pub fn opening(seed: impl Into<String>, config: &GameConfig) -> Self {
        let seed = seed.into();
        let size = config.board_size.max(GameConfig::MIN_BOARD_SIZE);
        let mut board = Board::empty(size);
        for (suffix, position) in [("a", Position::new(0, 0)), ("b", Position::new(1, 1))] {
            let tile = Tile::new(
                format!("{seed}-{suffix}"),
                GameConfig::BASE_TILE_VALUE,
                position,
            );
            board
                .insert(tile)
                .expect("opening positions lie inside a MIN_BOARD_SIZE board");
        }
        Self::new(seed, board)
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn with_best_score(mut self, best_score: u64) -> Self {
        self.best_score = self.best_score.max(best_score);
        self
    }

    /// Random stream anchored at this state's cursor.
    pub fn prng(&self) -> SeededPrng {
        SeededPrng::new(self.seed.clone(), self.seed_cursor)
    }

    pub fn is_game_over(&self) -> bool {
        self.status == EngineStatus::GameOver || detect_game_over(&self.board)
    }

    /// Most recent pre-move snapshot, if any.
    pub fn latest_snapshot(&self) -> Option<&SessionSnapshot> {
        self.undo_stack.last()
    }

    /// Deep copy suitable for storage: no queued commands, and nested
    /// snapshots carry neither queued commands nor their own history.
    pub fn sanitized(&self) -> Self {
        Self {
            pending_moves: Vec::new(),
            undo_stack: self
                .undo_stack
                .iter()
                .map(|snapshot| SessionSnapshot {
                    state: Self {
                        pending_moves: Vec::new(),
                        undo_stack: Vec::new(),
                        ..snapshot.state.clone()
                    },
                    ..snapshot.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// A point-in-time copy of a [`GameState`] plus resume metadata.
///
/// Used both for undo history and for the single persisted session slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SessionSnapshot {
    pub state: GameState,
    /// Milliseconds since the Unix epoch when the snapshot was taken.
    pub timestamp: i64,
    pub rng_cursor: u64,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub pending_commands: Vec<MoveCommand>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub last_visible_at: Option<i64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub orientation: Option<Orientation>,
}

impl SessionSnapshot {
    pub fn new(state: GameState, timestamp: i64) -> Self {
        let rng_cursor = state.seed_cursor;
        Self {
            state,
            timestamp,
            rng_cursor,
            pending_commands: Vec::new(),
            last_visible_at: None,
            orientation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Direction, InputSource};

    #[test]
    fn opening_fits_the_smallest_boards() {
        for requested in [0, 1, GameConfig::MIN_BOARD_SIZE] {
            let state = GameState::opening("seed-x", &GameConfig::with_board_size(requested));
            assert_eq!(state.board.size(), GameConfig::MIN_BOARD_SIZE);
            assert_eq!(state.board.values(), vec![vec![2, 0], vec![0, 2]]);
        }
    }

    #[test]
    fn opening_places_two_seeded_tiles() {
        let state = GameState::opening("seed-x", &GameConfig::default());
        assert_eq!(state.board.size(), 4);
        assert_eq!(state.board.tiles().count(), 2);
        assert_eq!(
            state.board.get(Position::new(0, 0)).unwrap().id.as_str(),
            "seed-x-a"
        );
        assert_eq!(
            state.board.get(Position::new(1, 1)).unwrap().id.as_str(),
            "seed-x-b"
        );
        assert_eq!(state.status, EngineStatus::Idle);
        assert_eq!(state.seed_cursor, 0);
    }

    #[test]
    fn best_score_only_rises() {
        let state = GameState::opening("s", &GameConfig::default())
            .with_best_score(40)
            .with_best_score(10);
        assert_eq!(state.best_score, 40);
    }

    #[test]
    fn prng_is_anchored_at_cursor() {
        use crate::rng::RngStream;

        let mut state = GameState::opening("s", &GameConfig::default());
        state.seed_cursor = 7;
        assert_eq!(state.prng().cursor(), 7);
    }

    #[test]
    fn sanitized_strips_queues_and_nested_history() {
        let mut state = GameState::opening("s", &GameConfig::default());
        let command = MoveCommand::new(Direction::Left, 0, InputSource::Keyboard);
        let mut nested = state.clone();
        nested.pending_moves.push(command.clone());
        nested
            .undo_stack
            .push(SessionSnapshot::new(state.clone(), 1));
        state.pending_moves.push(command);
        state.undo_stack.push(SessionSnapshot::new(nested, 2));

        let clean = state.sanitized();
        assert!(clean.pending_moves.is_empty());
        assert_eq!(clean.undo_stack.len(), 1);
        assert!(clean.undo_stack[0].state.pending_moves.is_empty());
        assert!(clean.undo_stack[0].state.undo_stack.is_empty());
        assert_eq!(clean.undo_stack[0].timestamp, 2);
    }
}
