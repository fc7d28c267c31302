//! Square tile grid and the tiles it holds.

use std::fmt;

use crate::error::{ErrorSeverity, GameError};

/// Matrix form of a board: rows of optional tiles. This is the wire shape.
pub type BoardMatrix = Vec<Vec<Option<Tile>>>;

/// Errors raised while building a board from untrusted input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board must have at least one row")]
    Empty,

    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },

    #[error("tile value {value} at {position} is not a power of two >= 2")]
    InvalidValue { value: u32, position: Position },

    #[error("tile {id} records position {stored} but sits at {actual}")]
    Misplaced {
        id: TileId,
        stored: Position,
        actual: Position,
    },

    #[error("position {position} is outside a {size}x{size} board")]
    OutOfBounds { position: Position, size: usize },
}

impl GameError for BoardError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Misplaced { .. } => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "BOARD_EMPTY",
            Self::NotSquare { .. } => "BOARD_NOT_SQUARE",
            Self::InvalidValue { .. } => "BOARD_INVALID_VALUE",
            Self::Misplaced { .. } => "BOARD_MISPLACED_TILE",
            Self::OutOfBounds { .. } => "BOARD_OUT_OF_BOUNDS",
        }
    }
}

/// Grid coordinates of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Identity of a tile instance, unique for the tile's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A numbered tile occupying one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
    /// Ids of the two tiles this one was merged from, if created by a merge.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub merged_from: Option<(TileId, TileId)>,
    /// Set on tiles spawned by the most recent move.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_new: bool,
}

impl Tile {
    pub fn new(id: impl Into<TileId>, value: u32, position: Position) -> Self {
        Self {
            id: id.into(),
            value,
            row: position.row,
            col: position.col,
            merged_from: None,
            is_new: false,
        }
    }

    #[must_use]
    pub fn spawned(mut self) -> Self {
        self.is_new = true;
        self
    }

    #[must_use]
    pub fn with_merged_from(mut self, first: TileId, second: TileId) -> Self {
        self.merged_from = Some((first, second));
        self
    }

    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    /// Copy carried into the next move: no provenance, not new.
    pub fn carried(&self) -> Self {
        Self {
            merged_from: None,
            is_new: false,
            ..self.clone()
        }
    }
}

/// Returns true for the values a tile may legally hold.
#[inline]
pub fn is_valid_tile_value(value: u32) -> bool {
    value >= 2 && value.is_power_of_two()
}

/// Square N×N grid of optional tiles, stored row-major.
///
/// Every stored tile's `(row, col)` matches its cell; all constructors
/// enforce this.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "BoardMatrix", into = "BoardMatrix")
)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Creates a board with no tiles.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Builds a board from a tile matrix, validating shape and placement.
    pub fn from_matrix(matrix: BoardMatrix) -> Result<Self, BoardError> {
        let size = matrix.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in matrix.into_iter().enumerate() {
            if line.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: line.len(),
                    size,
                });
            }
            for (col, cell) in line.into_iter().enumerate() {
                if let Some(tile) = &cell {
                    let actual = Position::new(row, col);
                    if !is_valid_tile_value(tile.value) {
                        return Err(BoardError::InvalidValue {
                            value: tile.value,
                            position: actual,
                        });
                    }
                    if tile.position() != actual {
                        return Err(BoardError::Misplaced {
                            id: tile.id.clone(),
                            stored: tile.position(),
                            actual,
                        });
                    }
                }
                cells.push(cell);
            }
        }

        Ok(Self { size, cells })
    }

    /// Builds a board from raw values where `0` is an empty cell.
    ///
    /// Tiles receive ids of the form `tile-{row}-{col}`.
    pub fn from_values<R>(rows: &[R]) -> Result<Self, BoardError>
    where
        R: AsRef<[u32]>,
    {
        let matrix = rows
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .iter()
                    .enumerate()
                    .map(|(col, &value)| {
                        (value != 0).then(|| {
                            Tile::new(
                                format!("tile-{row}-{col}"),
                                value,
                                Position::new(row, col),
                            )
                        })
                    })
                    .collect()
            })
            .collect();
        Self::from_matrix(matrix)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, position: Position) -> Option<usize> {
        (position.row < self.size && position.col < self.size)
            .then(|| position.row * self.size + position.col)
    }

    /// Tile at `position`, or `None` for empty or out-of-bounds cells.
    pub fn get(&self, position: Position) -> Option<&Tile> {
        self.index(position)
            .and_then(|index| self.cells[index].as_ref())
    }

    /// Places `tile` at its own coordinates, returning the displaced tile.
    pub fn insert(&mut self, tile: Tile) -> Result<Option<Tile>, BoardError> {
        let position = tile.position();
        let index = self.index(position).ok_or(BoardError::OutOfBounds {
            position,
            size: self.size,
        })?;
        Ok(self.cells[index].replace(tile))
    }

    /// Removes and returns the tile at `position`.
    pub fn remove(&mut self, position: Position) -> Option<Tile> {
        self.index(position)
            .and_then(|index| self.cells[index].take())
    }

    /// Iterates occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Option<&Tile>)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Position::new(index / size, index % size), cell.as_ref()))
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells()
            .filter(|(_, cell)| cell.is_none())
            .map(|(position, _)| position)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Cell values in row-major order, `0` for empty cells.
    pub fn flat_values(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().map_or(0, |tile| tile.value))
            .collect()
    }

    /// Cell values as rows, `0` for empty cells.
    pub fn values(&self) -> Vec<Vec<u32>> {
        self.flat_values()
            .chunks(self.size.max(1))
            .map(<[u32]>::to_vec)
            .collect()
    }

    pub fn max_value(&self) -> u32 {
        self.tiles().map(|tile| tile.value).max().unwrap_or(0)
    }

    /// Copy with transient animation flags (`is_new`, `merged_from`) cleared.
    pub fn settled(&self) -> Self {
        Self {
            size: self.size,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.as_ref().map(Tile::carried))
                .collect(),
        }
    }

    pub fn to_matrix(&self) -> BoardMatrix {
        self.cells
            .chunks(self.size.max(1))
            .map(<[Option<Tile>]>::to_vec)
            .collect()
    }
}

impl TryFrom<BoardMatrix> for Board {
    type Error = BoardError;

    fn try_from(matrix: BoardMatrix) -> Result<Self, Self::Error> {
        Self::from_matrix(matrix)
    }
}

impl From<Board> for BoardMatrix {
    fn from(board: Board) -> Self {
        board.to_matrix()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            let line: Vec<String> = row
                .iter()
                .map(|&value| {
                    if value == 0 {
                        format!("{:>5}", ".")
                    } else {
                        format!("{value:>5}")
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
