//! Terminal-state predicate.

use crate::state::{Board, Position};

/// True iff some cell is empty or some tile has an orthogonal neighbour of the
/// same value.
///
/// Scans the whole board; only right and down neighbours are compared since
/// adjacency is symmetric.
pub fn has_available_moves(board: &Board) -> bool {
    board.cells().any(|(position, cell)| match cell {
        None => true,
        Some(tile) => [
            Position::new(position.row, position.col + 1),
            Position::new(position.row + 1, position.col),
        ]
        .into_iter()
        .filter_map(|neighbour| board.get(neighbour))
        .any(|neighbour| neighbour.value == tile.value),
    })
}

/// True when no move can change the board.
#[inline]
pub fn detect_game_over(board: &Board) -> bool {
    !has_available_moves(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_means_moves_remain() {
        let board = Board::from_values(&[[2, 4], [8, 0]]).unwrap();
        assert!(has_available_moves(&board));
        assert!(!detect_game_over(&board));
    }

    #[test]
    fn full_board_with_horizontal_pair() {
        let board = Board::from_values(&[[2, 2], [4, 8]]).unwrap();
        assert!(has_available_moves(&board));
    }

    #[test]
    fn full_board_with_vertical_pair_in_last_column() {
        let board = Board::from_values(&[[2, 4], [8, 4]]).unwrap();
        assert!(has_available_moves(&board));
    }

    #[test]
    fn checkerboard_is_terminal() {
        let board = Board::from_values(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
        .unwrap();
        assert!(detect_game_over(&board));
    }

    #[test]
    fn diagonal_equality_does_not_count() {
        let board = Board::from_values(&[[2, 4], [4, 2]]).unwrap();
        assert!(detect_game_over(&board));
    }
}
