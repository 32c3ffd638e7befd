use crate::board::{Board, CENTER, PointSet};
use crate::flip::{DIRECTIONS, flips_for};
use crate::types::{Player, RuleVariant};

/// Number of disks the historical opening places on the centre squares.
const HISTORICAL_OPENING_DISKS: usize = 4;

/// Returns the points where `player` may place a disk under `variant`.
pub fn legal_points(board: &Board, player: Player, variant: RuleVariant) -> PointSet {
    let anchors = board.occupied();

    if variant == RuleVariant::Historical && anchors.len() < HISTORICAL_OPENING_DISKS {
        return CENTER.difference(anchors);
    }

    let candidates: PointSet = anchors
        .iter()
        .flat_map(|anchor| {
            DIRECTIONS
                .iter()
                .filter_map(move |&(dc, dr)| anchor.offset(dc, dr))
        })
        .filter(|&point| board.is_empty_at(point))
        .collect();

    candidates
        .iter()
        .filter(|&point| !flips_for(board, point, player).is_empty())
        .collect()
}
