//! Move resolution.
//!
//! [`MoveEngine`] is the authoritative reducer for [`GameState`]: it slides and
//! merges tiles along the move axis, spawns a tile from the seeded stream,
//! detects the terminal state, and reports everything that happened as an
//! ordered [`EngineEvent`] log plus flat [`TelemetryPayload`] records.
//!
//! Rejected moves and game over are successful outcomes. Errors are reserved
//! for a misbehaving random stream or an inconsistent board.

mod errors;
mod events;
pub mod game_over;
mod lines;

pub use errors::EngineError;
pub use events::{EngineEvent, NO_EFFECT_REASON};
pub use game_over::{detect_game_over, has_available_moves};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::action::{Direction, MoveCommand};
use crate::config::GameConfig;
use crate::rng::RngStream;
use crate::state::{Board, EngineStatus, GameState, SessionSnapshot, Tile, board_hash};
use crate::telemetry::{Platform, TelemetryEvent, TelemetryPayload};

/// Session id reported when neither the caller nor the state supplies one.
pub const UNKNOWN_SESSION: &str = "unknown-session";

/// Inputs for resolving one move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveContext {
    pub command: MoveCommand,
    pub platform: Platform,
    /// Overrides `GameState::session_id` in telemetry.
    pub session_id: Option<String>,
    /// Resolution time in milliseconds since the Unix epoch; wall clock if unset.
    pub now: Option<i64>,
}

impl MoveContext {
    pub fn new(command: MoveCommand, platform: Platform) -> Self {
        Self {
            command,
            platform,
            session_id: None,
            now: None,
        }
    }

    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    #[must_use]
    pub fn at(mut self, now: i64) -> Self {
        self.now = Some(now);
        self
    }
}

/// Complete result of resolving one move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub next_state: GameState,
    pub events: Vec<EngineEvent>,
    pub telemetry: Vec<TelemetryPayload>,
}

impl MoveOutcome {
    /// True when the move changed the board.
    pub fn accepted(&self) -> bool {
        self.telemetry
            .first()
            .is_some_and(|payload| payload.event == TelemetryEvent::MoveCompleted)
    }

    pub fn is_game_over(&self) -> bool {
        self.next_state.status == EngineStatus::GameOver
    }

    /// Sum of merge values produced by this move.
    pub fn score_delta(&self) -> u64 {
        self.events
            .iter()
            .map(|event| match event {
                EngineEvent::TileMerged { score_delta, .. } => *score_delta,
                _ => 0,
            })
            .sum()
    }
}

/// Resolves moves under a fixed [`GameConfig`].
#[derive(Clone, Debug, Default)]
pub struct MoveEngine {
    config: GameConfig,
}

impl MoveEngine {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Applies `context.command` to `state`, drawing spawns from `prng`.
    ///
    /// The input state is never modified. The stream is advanced only when the
    /// move is accepted and leaves an empty cell (one draw for the cell, one
    /// for the value).
    pub fn apply<R>(
        &self,
        state: &GameState,
        prng: &mut R,
        context: &MoveContext,
    ) -> Result<MoveOutcome, EngineError>
    where
        R: RngStream + ?Sized,
    {
        let command = &context.command;
        let stamp = Stamp::new(state, context);
        let size = state.board.size();
        let move_number = state.move_count + 1;

        let mut next_board = Board::empty(size);
        let mut events = Vec::new();
        let mut score_delta = 0u64;
        let mut moved = false;

        for line in lines::lines(size, command.direction) {
            let outcome = lines::compact_line(&line, &state.board, &mut next_board, move_number)?;
            events.extend(outcome.moves);
            events.extend(outcome.merges);
            score_delta += outcome.score_delta;
            moved |= outcome.moved;
        }

        if !moved {
            return Ok(if detect_game_over(&state.board) {
                self.terminal_outcome(state, &stamp)
            } else {
                self.rejected_outcome(state, &stamp)
            });
        }

        let empty_cells = next_board.empty_cells();
        if !empty_cells.is_empty() {
            let position = empty_cells[prng.next_int(empty_cells.len())?];
            let value = self.config.spawn_value(prng.next_f64());
            let tile = Tile::new(
                format!(
                    "spawn-{move_number}-{}-{}-{}",
                    position.row,
                    position.col,
                    prng.cursor()
                ),
                value,
                position,
            )
            .spawned();
            events.push(EngineEvent::TileSpawned {
                id: tile.id.clone(),
                value,
                position,
            });
            next_board.insert(tile)?;
        }

        let cursor = prng.cursor();
        let score = state.score + score_delta;
        let hash = board_hash(&next_board);
        let terminal = detect_game_over(&next_board);

        let mut telemetry = vec![stamp.payload(
            TelemetryEvent::MoveCompleted,
            format!("{}-{move_number}-{cursor}", state.seed),
            score_delta,
            hash.clone(),
            cursor,
        )];

        let next_state = GameState {
            board: next_board,
            score,
            best_score: state.best_score.max(score),
            move_count: move_number,
            seed: state.seed.clone(),
            seed_cursor: cursor,
            pending_moves: Vec::new(),
            undo_stack: self.push_undo(state, stamp.now),
            status: if terminal {
                EngineStatus::GameOver
            } else {
                EngineStatus::Animating
            },
            session_id: state.session_id.clone(),
            last_move_at: Some(stamp.now),
        };

        if terminal {
            events.push(EngineEvent::GameOver {
                board_hash: hash.clone(),
            });
            telemetry.push(stamp.payload(
                TelemetryEvent::GameOver,
                format!("{}-{move_number}-game-over", state.seed),
                0,
                hash,
                cursor,
            ));
        }

        tracing::debug!(
            direction = %command.direction,
            score_delta,
            move_count = move_number,
            seed_cursor = cursor,
            game_over = terminal,
            "move resolved"
        );

        Ok(MoveOutcome {
            next_state,
            events,
            telemetry,
        })
    }

    fn rejected_outcome(&self, state: &GameState, stamp: &Stamp) -> MoveOutcome {
        tracing::debug!(direction = %stamp.direction, "move rejected");
        MoveOutcome {
            next_state: state.clone(),
            events: vec![EngineEvent::rejected()],
            telemetry: vec![stamp.payload(
                TelemetryEvent::MoveRejected,
                format!("{}-{}-rejected", state.seed, state.move_count + 1),
                0,
                board_hash(&state.board),
                state.seed_cursor,
            )],
        }
    }

    fn terminal_outcome(&self, state: &GameState, stamp: &Stamp) -> MoveOutcome {
        tracing::debug!(direction = %stamp.direction, "no moves remain");
        let hash = board_hash(&state.board);
        MoveOutcome {
            next_state: GameState {
                status: EngineStatus::GameOver,
                pending_moves: Vec::new(),
                last_move_at: Some(stamp.now),
                ..state.clone()
            },
            events: vec![EngineEvent::GameOver {
                board_hash: hash.clone(),
            }],
            telemetry: vec![stamp.payload(
                TelemetryEvent::GameOver,
                format!("{}-{}-game-over", state.seed, state.move_count),
                0,
                hash,
                state.seed_cursor,
            )],
        }
    }

    /// Pre-move snapshot appended to the bounded undo history.
    fn push_undo(&self, state: &GameState, now: i64) -> Vec<SessionSnapshot> {
        let limit = self.config.undo_limit;
        if limit == 0 {
            return Vec::new();
        }

        let snapshot = GameState {
            board: state.board.settled(),
            pending_moves: Vec::new(),
            undo_stack: Vec::new(),
            last_move_at: Some(now),
            ..state.clone()
        };

        let mut stack = state.undo_stack.clone();
        stack.push(SessionSnapshot::new(snapshot, now));
        let excess = stack.len().saturating_sub(limit);
        stack.drain(..excess);
        stack
    }
}

/// Applies one move with the default configuration.
pub fn apply_move<R>(
    state: &GameState,
    prng: &mut R,
    context: &MoveContext,
) -> Result<MoveOutcome, EngineError>
where
    R: RngStream + ?Sized,
{
    MoveEngine::default().apply(state, prng, context)
}

/// Fields shared by every telemetry payload of one resolution.
struct Stamp<'a> {
    now: i64,
    session_id: String,
    direction: Direction,
    latency_ms: u64,
    seed: &'a str,
    platform: &'a Platform,
    timestamp: String,
}

impl<'a> Stamp<'a> {
    fn new(state: &'a GameState, context: &'a MoveContext) -> Self {
        let now = context
            .now
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let session_id = context
            .session_id
            .clone()
            .or_else(|| state.session_id.clone())
            .unwrap_or_else(|| UNKNOWN_SESSION.to_string());

        Self {
            now,
            session_id,
            direction: context.command.direction,
            latency_ms: u64::try_from(now.saturating_sub(context.command.requested_at))
                .unwrap_or(0),
            seed: &state.seed,
            platform: &context.platform,
            timestamp: iso_timestamp(now),
        }
    }

    fn payload(
        &self,
        event: TelemetryEvent,
        move_id: String,
        score_delta: u64,
        board_hash: String,
        seed_cursor: u64,
    ) -> TelemetryPayload {
        TelemetryPayload {
            session_id: self.session_id.clone(),
            move_id,
            direction: self.direction,
            score_delta,
            board_hash,
            latency_ms: self.latency_ms,
            seed: self.seed.to_string(),
            seed_cursor,
            platform: self.platform.clone(),
            timestamp: self.timestamp.clone(),
            event,
            device_category: None,
            gesture_type: None,
            orientation: None,
            resume_at: None,
        }
    }
}

/// Formats epoch milliseconds as an ISO-8601 UTC string (`...T..:..:..mmmZ`).
pub fn iso_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::InputSource;
    use crate::rng::SeededPrng;
    use crate::state::Position;

    fn context(direction: Direction) -> MoveContext {
        MoveContext::new(
            MoveCommand::new(direction, 1_000, InputSource::Keyboard),
            Platform::new("test-agent", InputSource::Keyboard),
        )
        .at(1_250)
    }

    #[test]
    fn iso_timestamp_has_millisecond_precision() {
        assert_eq!(iso_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(iso_timestamp(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn latency_is_clamped_at_zero() {
        let state = GameState::new("s", Board::from_values(&[[2, 0], [0, 0]]).unwrap());
        let mut ctx = context(Direction::Right);
        ctx.command.requested_at = 5_000;
        let outcome = apply_move(&state, &mut state.prng(), &ctx).unwrap();
        assert_eq!(outcome.telemetry[0].latency_ms, 0);
    }

    #[test]
    fn session_id_falls_back_through_state() {
        let state = GameState::new("s", Board::from_values(&[[2, 0], [0, 0]]).unwrap());
        let outcome = apply_move(&state, &mut state.prng(), &context(Direction::Left)).unwrap();
        assert_eq!(outcome.telemetry[0].session_id, UNKNOWN_SESSION);

        let state = state.with_session_id("from-state");
        let outcome = apply_move(&state, &mut state.prng(), &context(Direction::Left)).unwrap();
        assert_eq!(outcome.telemetry[0].session_id, "from-state");

        let ctx = context(Direction::Left).with_session_id("from-context");
        let outcome = apply_move(&state, &mut state.prng(), &ctx).unwrap();
        assert_eq!(outcome.telemetry[0].session_id, "from-context");
    }

    #[test]
    fn undo_history_respects_limit() {
        let engine = MoveEngine::new(GameConfig::default().undo_limit(2));
        let mut state = GameState::opening("undo", &GameConfig::default());
        let mut accepted = 0;
        for direction in [Direction::Right, Direction::Down, Direction::Left, Direction::Up]
            .into_iter()
            .cycle()
            .take(12)
        {
            let mut prng = state.prng();
            let outcome = engine.apply(&state, &mut prng, &context(direction)).unwrap();
            if outcome.accepted() {
                accepted += 1;
            }
            state = outcome.next_state;
            if state.status == EngineStatus::GameOver {
                break;
            }
        }
        assert!(accepted >= 2);
        assert!(state.undo_stack.len() <= 2);
        assert!(
            state
                .undo_stack
                .iter()
                .all(|snapshot| snapshot.state.undo_stack.is_empty())
        );
    }

    #[test]
    fn zero_undo_limit_keeps_no_history() {
        let engine = MoveEngine::new(GameConfig::default().undo_limit(0));
        let state = GameState::new("s", Board::from_values(&[[2, 0], [0, 0]]).unwrap());
        let outcome = engine
            .apply(&state, &mut state.prng(), &context(Direction::Right))
            .unwrap();
        assert!(outcome.accepted());
        assert!(outcome.next_state.undo_stack.is_empty());
    }

    #[test]
    fn rejecting_stream_error_surfaces() {
        struct Broken;
        impl RngStream for Broken {
            fn cursor(&self) -> u64 {
                0
            }
            fn next_f64(&mut self) -> f64 {
                0.0
            }
            fn next_int(&mut self, max_exclusive: usize) -> Result<usize, crate::rng::RngError> {
                Err(crate::rng::RngError::NonPositiveBound { max_exclusive })
            }
        }

        let state = GameState::new("s", Board::from_values(&[[2, 0], [0, 0]]).unwrap());
        let err = apply_move(&state, &mut Broken, &context(Direction::Right)).unwrap_err();
        assert!(matches!(err, EngineError::Rng(_)));
    }

    #[test]
    fn merge_past_u32_range_is_an_error() {
        let top = 1 << 31;
        let state = GameState::new("s", Board::from_values(&[[top, top], [0, 0]]).unwrap());
        let mut prng = SeededPrng::new("s", 0);
        let err = apply_move(&state, &mut prng, &context(Direction::Left)).unwrap_err();
        assert_eq!(
            err,
            EngineError::ValueOverflow {
                value: top,
                position: Position::new(0, 0),
            }
        );
        assert_eq!(prng.cursor(), 0);
    }

    #[test]
    fn accepted_move_draws_twice() {
        let state = GameState::new("s", Board::from_values(&[[2, 0], [0, 0]]).unwrap());
        let mut prng = SeededPrng::new("s", 0);
        let outcome = apply_move(&state, &mut prng, &context(Direction::Right)).unwrap();
        assert_eq!(outcome.next_state.seed_cursor, 2);
        assert_eq!(prng.transcript().len(), 2);
    }
}
