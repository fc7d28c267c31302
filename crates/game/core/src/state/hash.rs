//! Order-dependent fingerprint of board contents.

use super::Board;

/// Formats the board hash carried by telemetry and `GameOver` events.
///
/// Layout: `b` + each cell value as (at least) two hex digits in row-major
/// order, then `-` and a 31-multiplier rolling hash of the same values in hex.
/// Tile ids do not participate; equal layouts hash equally.
pub fn board_hash(board: &Board) -> String {
    let values = board.flat_values();

    let hash = values
        .iter()
        .fold(0u32, |acc, &value| acc.wrapping_mul(31).wrapping_add(value));

    let encoded: String = values.iter().map(|value| format!("{value:02x}")).collect();
    format!("b{encoded}-{hash:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_hash() {
        let board = Board::empty(2);
        assert_eq!(board_hash(&board), "b00000000-0");
    }

    #[test]
    fn hash_is_order_dependent() {
        let a = Board::from_values(&[[2, 4], [0, 0]]).unwrap();
        let b = Board::from_values(&[[4, 2], [0, 0]]).unwrap();
        // 2*31^3 + 4*31^2 = 59582 + 3844 = 63426 = 0xf7c2
        assert_eq!(board_hash(&a), "b02040000-f7c2");
        assert_ne!(board_hash(&a), board_hash(&b));
    }

    #[test]
    fn large_values_widen_the_encoding() {
        let board = Board::from_values(&[[1024, 0], [0, 0]]).unwrap();
        assert!(board_hash(&board).starts_with("b400000000-"));
    }
}
