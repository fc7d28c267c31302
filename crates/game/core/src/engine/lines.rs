//! Line partitioning and per-line compaction.

use crate::action::Direction;
use crate::state::{Board, Position, Tile};

use super::errors::EngineError;
use super::events::EngineEvent;

/// Splits an N×N board into N lines along the move axis.
///
/// Index 0 of each line is the cell tiles compact toward: column 0 for
/// `Left`, column N-1 for `Right`, row 0 for `Up`, row N-1 for `Down`.
pub(crate) fn lines(size: usize, direction: Direction) -> Vec<Vec<Position>> {
    (0..size)
        .map(|index| {
            (0..size)
                .map(|step| {
                    let along = if direction.toward_origin() {
                        step
                    } else {
                        size - 1 - step
                    };
                    if direction.is_horizontal() {
                        Position::new(index, along)
                    } else {
                        Position::new(along, index)
                    }
                })
                .collect()
        })
        .collect()
}

/// Result of compacting one line into the next board.
#[derive(Debug, Default)]
pub(crate) struct LineOutcome {
    pub moves: Vec<EngineEvent>,
    pub merges: Vec<EngineEvent>,
    pub score_delta: u64,
    pub moved: bool,
}

/// Greedily compacts `line` of `source` into `next`.
///
/// `move_number` is the 1-based number the move will receive when accepted;
/// it namespaces ids of tiles created by merges. Each target slot merges at
/// most once.
pub(crate) fn compact_line(
    line: &[Position],
    source: &Board,
    next: &mut Board,
    move_number: u64,
) -> Result<LineOutcome, EngineError> {
    let tiles: Vec<Tile> = line
        .iter()
        .filter_map(|&position| source.get(position))
        .map(Tile::carried)
        .collect();

    let mut outcome = LineOutcome::default();
    let mut merged_slots = vec![false; line.len()];
    let mut source_index = 0;
    let mut target_index = 0;

    while source_index < tiles.len() && target_index < line.len() {
        let tile = &tiles[source_index];
        let target = line[target_index];
        let travelled = tile.position() != target;

        match next.get(target) {
            None => {
                if travelled {
                    outcome.moves.push(EngineEvent::TileMoved {
                        id: tile.id.clone(),
                        from: tile.position(),
                        to: target,
                    });
                    outcome.moved = true;
                }
                next.insert(Tile {
                    row: target.row,
                    col: target.col,
                    ..tile.clone()
                })?;
                source_index += 1;
            }
            Some(occupant) if !merged_slots[target_index] && occupant.value == tile.value => {
                let value = occupant
                    .value
                    .checked_mul(2)
                    .ok_or(EngineError::ValueOverflow {
                        value: occupant.value,
                        position: target,
                    })?;
                let consumed = (occupant.id.clone(), tile.id.clone());
                let merged = Tile::new(
                    format!(
                        "merge-{move_number}-{}-{}-{target_index}",
                        target.row, target.col
                    ),
                    value,
                    target,
                )
                .with_merged_from(consumed.0.clone(), consumed.1.clone());

                if travelled {
                    outcome.moves.push(EngineEvent::TileMoved {
                        id: tile.id.clone(),
                        from: tile.position(),
                        to: target,
                    });
                }
                outcome.merges.push(EngineEvent::TileMerged {
                    target_id: merged.id.clone(),
                    consumed_ids: consumed,
                    value,
                    score_delta: u64::from(value),
                });

                next.insert(merged)?;
                merged_slots[target_index] = true;
                outcome.score_delta += u64::from(value);
                outcome.moved = true;
                source_index += 1;
                target_index += 1;
            }
            Some(_) => target_index += 1,
        }
    }

    Ok(outcome)
}
