use crate::board::{Board, PointSet};
use crate::flip::flips_for;
use crate::types::{Player, Point};

/// Picks a point for a computer-controlled turn.
pub trait MoveSelector: Send + Sync {
    /// Returns `None` only when `legal` is empty.
    fn select_point(&self, board: &Board, player: Player, legal: PointSet) -> Option<Point>;
}

/// One-ply greedy heuristic: maximise disks flipped by this placement.
///
/// Ties go to the first candidate in row-major order.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedySelector;

impl MoveSelector for GreedySelector {
    fn select_point(&self, board: &Board, player: Player, legal: PointSet) -> Option<Point> {
        let mut best: Option<(Point, usize)> = None;

        for candidate in legal.iter() {
            let count = flips_for(board, candidate, player).len();
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((candidate, count));
            }
        }

        if let Some((point, count)) = best {
            tracing::debug!(?player, ?point, flips = count, "greedy selector chose point");
        }
        best.map(|(point, _)| point)
    }
}
