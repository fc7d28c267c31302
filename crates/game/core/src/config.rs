/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameConfig {
    /// Edge length of the square board used for fresh sessions.
    pub board_size: usize,

    /// Probability that a spawned tile is a 4 instead of a 2.
    pub four_probability: f64,

    /// Maximum number of pre-move snapshots retained on the undo stack.
    ///
    /// The oldest snapshot is dropped first. Zero disables the history.
    pub undo_limit: usize,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Smallest board on which a merge is still possible.
    pub const MIN_BOARD_SIZE: usize = 2;
    /// Value of a regular spawned tile.
    pub const BASE_TILE_VALUE: u32 = 2;
    /// Value of the rarer spawned tile.
    pub const BONUS_TILE_VALUE: u32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BOARD_SIZE: usize = 4;
    pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;
    pub const DEFAULT_UNDO_LIMIT: usize = 1;

    pub fn new() -> Self {
        Self {
            board_size: Self::DEFAULT_BOARD_SIZE,
            four_probability: Self::DEFAULT_FOUR_PROBABILITY,
            undo_limit: Self::DEFAULT_UNDO_LIMIT,
        }
    }

    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size: board_size.max(Self::MIN_BOARD_SIZE),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn undo_limit(mut self, undo_limit: usize) -> Self {
        self.undo_limit = undo_limit;
        self
    }

    /// Picks the value of a spawned tile from a uniform draw in `[0, 1)`.
    pub fn spawn_value(&self, draw: f64) -> u32 {
        if draw < self.four_probability {
            Self::BONUS_TILE_VALUE
        } else {
            Self::BASE_TILE_VALUE
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
