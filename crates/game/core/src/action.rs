//! Move commands and the input vocabulary that produces them.
//!
//! A [`MoveCommand`] is ephemeral: created per input event by a front-end,
//! queued by the session, and consumed by [`crate::engine::apply_move`].

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Direction tiles slide toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// True for moves that compact along rows.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when tiles compact toward index 0 of the axis (top or left edge).
    #[inline]
    pub const fn toward_origin(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

/// Input modality that produced a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InputSource {
    #[default]
    Keyboard,
    Touch,
    Assistive,
    Tap,
}

/// A single requested move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoveCommand {
    pub direction: Direction,
    /// Milliseconds since the Unix epoch at which the input was captured.
    pub requested_at: i64,
    pub source: InputSource,
}

impl MoveCommand {
    pub fn new(direction: Direction, requested_at: i64, source: InputSource) -> Self {
        Self {
            direction,
            requested_at,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!(Direction::from_str("LEFT").unwrap(), Direction::Left);
        assert_eq!(Direction::from_str("up").unwrap(), Direction::Up);
        assert!(Direction::from_str("sideways").is_err());
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn axis_helpers() {
        assert!(Direction::Left.is_horizontal());
        assert!(!Direction::Up.is_horizontal());
        assert!(Direction::Up.toward_origin());
        assert!(!Direction::Right.toward_origin());
    }
}
