//! Session store driven by front-ends.
//!
//! A [`Session`] owns the current [`GameState`] and everything around it that
//! the engine does not know about: the command queue that waits for
//! animations, gesture metadata for telemetry, restart bookkeeping, and the
//! persisted snapshot slot.
//!
//! All operations take the current time explicitly so that a session can be
//! driven deterministically from tests.

mod enrich;

pub use enrich::{GestureMetadata, LastGesture};
pub use crate::telemetry::RestartSource;

use std::collections::VecDeque;
use std::sync::Arc;

use tile_core::{
    Direction, EngineEvent, EngineStatus, GameState, InputSource, MoveCommand, MoveContext,
    MoveEngine, Orientation, Platform, SessionSnapshot, TelemetryEvent, UNKNOWN_SESSION,
    iso_timestamp,
};

use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::repository::SnapshotRepository;
use crate::telemetry::{RestartEvent, SessionRestartPayload, TelemetryRecord};

/// Locale reported when the environment does not name one.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Clone, Debug)]
struct PendingCommand {
    command: MoveCommand,
    metadata: Option<GestureMetadata>,
}

/// Playable session around the deterministic engine.
pub struct Session {
    engine: MoveEngine,
    game: GameState,
    /// Events of the most recent resolution; cleared when its animation ends.
    events: Vec<EngineEvent>,
    pending_telemetry: Vec<TelemetryRecord>,
    pending_commands: VecDeque<PendingCommand>,
    is_animating: bool,
    orientation: Orientation,
    last_gesture: Option<LastGesture>,
    resume_at: Option<i64>,
    no_move_prompt_at: Option<i64>,
    last_visible_at: Option<i64>,
    repository: Option<Arc<dyn SnapshotRepository>>,
    seed: String,
    fixed_session_id: Option<String>,
    user_agent: String,
    locale: String,
}

impl Session {
    /// Builds the opening state and resumes a stored snapshot when one exists.
    ///
    /// The stored best score is honoured even when no snapshot is present.
    pub fn bootstrap(
        config: &RuntimeConfig,
        repository: Option<Arc<dyn SnapshotRepository>>,
        now: i64,
    ) -> Result<Self> {
        let session_id = config
            .session_id
            .clone()
            .unwrap_or_else(|| generate_session_id(now));

        let mut game = GameState::opening(config.seed.clone(), &config.game)
            .with_session_id(session_id.clone());
        let mut orientation = Orientation::Landscape;
        let mut last_visible_at = None;

        if let Some(repository) = &repository {
            game = game.with_best_score(repository.load_best_score()?);

            if let Some(snapshot) = repository.load()? {
                tracing::info!(
                    move_count = snapshot.state.move_count,
                    rng_cursor = snapshot.rng_cursor,
                    "Resuming stored session"
                );
                orientation = snapshot.orientation.unwrap_or(orientation);
                last_visible_at = snapshot.last_visible_at;
                game = resume(snapshot, game.best_score, session_id);
            }
        }

        tracing::info!(
            seed = %game.seed,
            session_id = game.session_id.as_deref().unwrap_or(UNKNOWN_SESSION),
            best_score = game.best_score,
            "Session ready"
        );

        Ok(Self {
            engine: MoveEngine::new(config.game.clone()),
            game,
            events: Vec::new(),
            pending_telemetry: Vec::new(),
            pending_commands: VecDeque::new(),
            is_animating: false,
            orientation,
            last_gesture: None,
            resume_at: None,
            no_move_prompt_at: None,
            last_visible_at,
            repository,
            seed: config.seed.clone(),
            fixed_session_id: config.session_id.clone(),
            user_agent: config.user_agent.clone(),
            locale: detect_locale(),
        })
    }

    /// Requests a move.
    ///
    /// Ignored once the game is over. While an animation is running the
    /// command is queued and resolved by
    /// [`complete_animation`](Self::complete_animation).
    pub fn enqueue_move(
        &mut self,
        direction: Direction,
        source: InputSource,
        metadata: Option<GestureMetadata>,
        now: i64,
    ) -> Result<()> {
        if self.game.status == EngineStatus::GameOver {
            tracing::debug!(%direction, "Ignoring move after game over");
            return Ok(());
        }

        let requested_at = metadata
            .as_ref()
            .and_then(|metadata| metadata.started_at)
            .unwrap_or(now);
        let entry = PendingCommand {
            command: MoveCommand::new(direction, requested_at, source),
            metadata,
        };

        self.pending_commands.push_back(entry);
        if self.is_animating {
            self.sync_pending_moves();
            tracing::debug!(
                %direction,
                queued = self.pending_commands.len(),
                "Move queued behind animation"
            );
            return Ok(());
        }

        self.drain_queue(now)
    }

    /// Ends the running animation and resolves queued commands.
    pub fn complete_animation(&mut self, now: i64) -> Result<()> {
        self.game.board = self.game.board.settled();
        self.is_animating = false;
        self.events.clear();

        if self.game.status == EngineStatus::GameOver {
            self.pending_commands.clear();
            self.game.pending_moves.clear();
            return Ok(());
        }

        self.game.status = EngineStatus::Idle;
        self.drain_queue(now)
    }

    /// Drains the telemetry produced since the last call.
    pub fn consume_telemetry(&mut self) -> Vec<TelemetryRecord> {
        std::mem::take(&mut self.pending_telemetry)
    }

    /// Adds externally produced records and tracks mobile gestures among them.
    pub fn register_telemetry(&mut self, records: Vec<TelemetryRecord>, now: i64) {
        let gesture = records.iter().find_map(|record| match record {
            TelemetryRecord::Move(payload)
                if payload.event == TelemetryEvent::MoveCompleted
                    && payload.device_category == Some(tile_core::DeviceCategory::Mobile) =>
            {
                Some(LastGesture {
                    gesture_type: payload
                        .gesture_type
                        .unwrap_or(tile_core::GestureType::Swipe),
                    latency_ms: payload.latency_ms,
                    completed_at: now,
                })
            }
            _ => None,
        });
        if gesture.is_some() {
            self.last_gesture = gesture;
        }
        self.pending_telemetry.extend(records);
    }

    /// Starts a new game, keeping the best score.
    ///
    /// A `session.restart` record for the finished session is queued ahead of
    /// anything the new session produces. The stored slot is replaced by the
    /// fresh opening position; storage failures are logged and play goes on.
    pub fn restart(&mut self, source: RestartSource, now: i64) {
        let previous_id = self
            .game
            .session_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_SESSION.to_string());
        let best_score = self.game.best_score;

        self.pending_telemetry
            .push(TelemetryRecord::SessionRestart(SessionRestartPayload {
                event: RestartEvent::SessionRestart,
                session_id: previous_id.clone(),
                timestamp: iso_timestamp(now),
                triggered_by: source,
                best_score,
                locale: self.locale.clone(),
            }));

        let session_id = self
            .fixed_session_id
            .clone()
            .unwrap_or_else(|| generate_session_id(now));
        self.game = GameState::opening(self.seed.clone(), self.engine.config())
            .with_session_id(session_id)
            .with_best_score(best_score);
        self.events.clear();
        self.pending_commands.clear();
        self.is_animating = false;
        self.last_gesture = None;
        self.resume_at = None;
        self.no_move_prompt_at = None;
        self.last_visible_at = None;

        tracing::info!(
            ?source,
            previous_session = %previous_id,
            best_score,
            "Session restarted"
        );

        if let Some(repository) = &self.repository {
            if let Err(error) = repository.clear() {
                tracing::warn!(%error, "Failed to clear stored session");
            }
        }
        self.persist_snapshot(now);
    }

    /// Replaces the game wholesale and resets all transient session state.
    pub fn hydrate(&mut self, game: GameState) {
        self.game = game;
        self.events.clear();
        self.pending_telemetry.clear();
        self.pending_commands.clear();
        self.is_animating = false;
        self.last_gesture = None;
        self.resume_at = None;
        self.no_move_prompt_at = None;
        self.last_visible_at = None;
    }

    /// Writes the current state to the repository, if one is attached.
    ///
    /// Failures are logged and otherwise ignored; play continues without
    /// persistence.
    pub fn persist_snapshot(&self, now: i64) {
        let Some(repository) = &self.repository else {
            return;
        };

        let mut snapshot = SessionSnapshot::new(self.game.sanitized(), now);
        snapshot.pending_commands = self
            .pending_commands
            .iter()
            .map(|entry| entry.command.clone())
            .collect();
        snapshot.last_visible_at = self.last_visible_at;
        snapshot.orientation = Some(self.orientation);

        if let Err(error) = repository.save(&snapshot) {
            tracing::warn!(%error, "Failed to persist session snapshot");
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Stamps the next resolved move with a resume time.
    pub fn set_resume_at(&mut self, timestamp: Option<i64>) {
        self.resume_at = timestamp;
    }

    pub fn set_no_move_prompt(&mut self, timestamp: Option<i64>) {
        self.no_move_prompt_at = timestamp;
    }

    pub fn set_last_visible(&mut self, timestamp: Option<i64>) {
        self.last_visible_at = timestamp;
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn is_game_over(&self) -> bool {
        self.game.status == EngineStatus::GameOver
    }

    pub fn queued_moves(&self) -> usize {
        self.pending_commands.len()
    }

    pub fn pending_telemetry(&self) -> &[TelemetryRecord] {
        &self.pending_telemetry
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn last_gesture(&self) -> Option<LastGesture> {
        self.last_gesture
    }

    pub fn resume_at(&self) -> Option<i64> {
        self.resume_at
    }

    pub fn no_move_prompt_at(&self) -> Option<i64> {
        self.no_move_prompt_at
    }

    pub fn last_visible_at(&self) -> Option<i64> {
        self.last_visible_at
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolves queued commands in order until one starts an animation.
    ///
    /// Rejected commands do not animate, so the next one is tried right away;
    /// game over discards whatever is left.
    fn drain_queue(&mut self, now: i64) -> Result<()> {
        while !self.is_animating {
            let Some(next) = self.pending_commands.pop_front() else {
                break;
            };
            self.resolve(next, now)?;
        }
        self.sync_pending_moves();
        Ok(())
    }

    fn resolve(&mut self, entry: PendingCommand, now: i64) -> Result<()> {
        let PendingCommand { command, metadata } = entry;
        let session_id = self
            .game
            .session_id
            .clone()
            .unwrap_or_else(|| generate_session_id(now));

        let mut prng = self.game.prng();
        let context = MoveContext::new(
            command.clone(),
            Platform::new(self.user_agent.clone(), command.source),
        )
        .with_session_id(session_id.clone())
        .at(now);
        let outcome = self.engine.apply(&self.game, &mut prng, &context)?;

        let resume_stamp = metadata
            .as_ref()
            .and_then(|metadata| metadata.resume_at)
            .or(self.resume_at);
        let mut telemetry = outcome.telemetry;
        enrich::enrich(
            &mut telemetry,
            metadata.as_ref(),
            self.orientation,
            resume_stamp,
        );

        if let Some(gesture_type) = metadata.as_ref().and_then(|metadata| metadata.gesture_type) {
            let latency_ms = metadata
                .as_ref()
                .and_then(|metadata| metadata.latency_ms)
                .or_else(|| telemetry.first().map(|payload| payload.latency_ms))
                .unwrap_or(0);
            self.last_gesture = Some(LastGesture {
                gesture_type,
                latency_ms,
                completed_at: now,
            });
        }
        if resume_stamp.is_some() {
            self.resume_at = None;
        }

        self.game = outcome.next_state;
        self.game.session_id = Some(session_id);
        if self.game.status == EngineStatus::GameOver {
            self.pending_commands.clear();
        }
        self.sync_pending_moves();
        self.is_animating = self.game.status == EngineStatus::Animating;
        self.events = outcome.events;
        self.pending_telemetry
            .extend(telemetry.into_iter().map(TelemetryRecord::from));

        self.persist_snapshot(now);
        Ok(())
    }

    /// Mirrors the command queue into `GameState::pending_moves`.
    fn sync_pending_moves(&mut self) {
        self.game.pending_moves = self
            .pending_commands
            .iter()
            .map(|entry| entry.command.clone())
            .collect();
    }
}

/// Applies a stored snapshot on top of the freshly built opening state.
fn resume(snapshot: SessionSnapshot, best_score: u64, fallback_id: String) -> GameState {
    let SessionSnapshot {
        state, rng_cursor, ..
    } = snapshot;
    let session_id = state.session_id.clone().unwrap_or(fallback_id);
    GameState {
        seed_cursor: rng_cursor,
        status: EngineStatus::Idle,
        pending_moves: Vec::new(),
        session_id: Some(session_id),
        ..state
    }
    .with_best_score(best_score)
}

fn generate_session_id(now: i64) -> String {
    format!("session-{now}-{:x}", rand::random::<u64>())
}

/// Locale from the POSIX environment as a BCP 47 tag (`en_US.UTF-8` -> `en-US`).
fn detect_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|raw| normalize_locale(&raw))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string())
}

fn normalize_locale(raw: &str) -> Option<String> {
    let tag = raw.split(['.', '@']).next()?.trim();
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        return None;
    }
    Some(tag.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_locales_become_language_tags() {
        assert_eq!(normalize_locale("en_US.UTF-8").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale("de_DE@euro").as_deref(), Some("de-DE"));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn generated_session_ids_carry_the_timestamp() {
        let id = generate_session_id(1_700);
        assert!(id.starts_with("session-1700-"));
        assert_ne!(id, generate_session_id(1_700));
    }
}
