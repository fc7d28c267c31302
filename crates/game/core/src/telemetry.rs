//! Flat telemetry records produced by the engine.
//!
//! The engine only builds payloads; batching and delivery belong to the
//! runtime.

use strum::{Display, EnumString, IntoStaticStr};

use crate::action::{Direction, InputSource};

/// Closed set of move-level telemetry kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TelemetryEvent {
    #[strum(serialize = "move.completed")]
    #[cfg_attr(feature = "serde", serde(rename = "move.completed"))]
    MoveCompleted,
    #[strum(serialize = "move.rejected")]
    #[cfg_attr(feature = "serde", serde(rename = "move.rejected"))]
    MoveRejected,
    #[strum(serialize = "game.over")]
    #[cfg_attr(feature = "serde", serde(rename = "game.over"))]
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DeviceCategory {
    Mobile,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GestureType {
    Swipe,
    Tap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Client description attached to every payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Platform {
    pub user_agent: String,
    pub input_mode: InputSource,
}

impl Platform {
    pub fn new(user_agent: impl Into<String>, input_mode: InputSource) -> Self {
        Self {
            user_agent: user_agent.into(),
            input_mode,
        }
    }
}

/// One telemetry record for a resolved, rejected, or terminal move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TelemetryPayload {
    pub session_id: String,
    pub move_id: String,
    pub direction: Direction,
    pub score_delta: u64,
    pub board_hash: String,
    pub latency_ms: u64,
    pub seed: String,
    pub seed_cursor: u64,
    pub platform: Platform,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub event: TelemetryEvent,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub device_category: Option<DeviceCategory>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub gesture_type: Option<GestureType>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub orientation: Option<Orientation>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub resume_at: Option<i64>,
}

/// True when a payload carries a complete mobile interaction description:
/// mobile device, a swipe or tap gesture, and a known orientation.
pub fn is_mobile_interaction(payload: &TelemetryPayload) -> bool {
    payload.device_category == Some(DeviceCategory::Mobile)
        && payload.gesture_type.is_some()
        && payload.orientation.is_some()
}
