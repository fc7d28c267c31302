//! Records accepted by the telemetry queue.

use serde::{Deserialize, Serialize};
use tile_core::TelemetryPayload;

/// What triggered a session restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartSource {
    /// Restart chosen from the game-over prompt.
    #[serde(rename = "gameover-modal")]
    GameOverModal,
    /// Restart requested explicitly during play.
    RestartButton,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestartEvent {
    #[default]
    #[serde(rename = "session.restart")]
    SessionRestart,
}

/// Emitted once per restart, before the new session begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRestartPayload {
    pub event: RestartEvent,
    pub session_id: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub triggered_by: RestartSource,
    pub best_score: u64,
    pub locale: String,
}

/// Any record the queue can carry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryRecord {
    Move(TelemetryPayload),
    SessionRestart(SessionRestartPayload),
}

impl TelemetryRecord {
    /// Wire name of the record's `event` field.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Move(payload) => payload.event.into(),
            Self::SessionRestart(_) => "session.restart",
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            Self::Move(payload) => &payload.session_id,
            Self::SessionRestart(payload) => &payload.session_id,
        }
    }
}

impl From<TelemetryPayload> for TelemetryRecord {
    fn from(payload: TelemetryPayload) -> Self {
        Self::Move(payload)
    }
}

impl From<SessionRestartPayload> for TelemetryRecord {
    fn from(payload: SessionRestartPayload) -> Self {
        Self::SessionRestart(payload)
    }
}

/// Unit of delivery: `{"events": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryBatch {
    pub events: Vec<TelemetryRecord>,
}

impl TelemetryBatch {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
