//! Disk capture resolution.
//!
//! A placement captures every straight, unbroken run of opponent disks that
//! starts next to the placed disk and ends on one of the placer's own disks.

use crate::board::{Board, PointSet};
use crate::types::{Cell, Player, Point};

/// The eight compass offsets as `(column, row)` deltas.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Returns the disks `player` would capture by placing at `point`.
///
/// Dry run: the board is not touched. An occupied `point` captures nothing.
pub fn flips_for(board: &Board, point: Point, player: Player) -> PointSet {
    if !board.is_empty_at(point) {
        return PointSet::EMPTY;
    }

    let mut flips = PointSet::EMPTY;
    for (dc, dr) in DIRECTIONS {
        let mut line = PointSet::EMPTY;
        let mut cursor = point.offset(dc, dr);

        while let Some(here) = cursor {
            match board.occupant_at(here) {
                Cell::Empty => break,
                Cell::Occupied(owner) if owner == player => {
                    flips = flips.union(line);
                    break;
                }
                Cell::Occupied(_) => line.insert(here),
            }
            cursor = here.offset(dc, dr);
        }
    }

    flips
}

/// Writes `player`'s disk at `point`, flips every captured disk and returns the
/// flipped set. Legality is the caller's concern.
pub fn play(board: &mut Board, point: Point, player: Player) -> PointSet {
    let flips = flips_for(board, point, player);
    board.place(point, player);
    board.apply(flips, player);
    flips
}
