//! Deterministic rules and data types for the 1024 sliding-tile puzzle.
//!
//! `tile-core` defines the canonical rules (board, moves, engine, random
//! stream) and exposes pure APIs reused by the runtime and every front-end.
//! All state transitions flow through [`engine::MoveEngine`], and supporting
//! crates depend on the types re-exported here.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod rng;
pub mod state;
pub mod telemetry;

pub use action::{Direction, InputSource, MoveCommand};
pub use config::GameConfig;
pub use engine::{
    EngineError, EngineEvent, MoveContext, MoveEngine, MoveOutcome, NO_EFFECT_REASON,
    UNKNOWN_SESSION, apply_move, detect_game_over, has_available_moves, iso_timestamp,
};
pub use error::{ErrorSeverity, GameError};
pub use rng::{
    PrngSnapshot, RngError, RngStream, SeededPrng, TranscriptEntry, advance_seed_cursor,
    fork_with_advance,
};
pub use state::{
    Board, BoardError, BoardMatrix, EngineStatus, GameState, Position, SessionSnapshot, Tile,
    TileId, board_hash, is_valid_tile_value,
};
pub use telemetry::{
    DeviceCategory, GestureType, Orientation, Platform, TelemetryEvent, TelemetryPayload,
    is_mobile_interaction,
};
