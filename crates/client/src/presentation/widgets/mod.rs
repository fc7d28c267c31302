//! Widget modules for UI rendering.
//!
//! Each widget is a pure function over game state that renders into a frame.

pub mod board;
pub mod footer;
pub mod game_over;
pub mod hud;
