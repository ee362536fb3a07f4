//! Local legality of an oriented tile at a cell.

use crate::board::Board;
use crate::color::Color;
use crate::direction::Direction;

/// Does an oriented tile satisfy border and already-placed-neighbor
/// constraints at (row, col)?
///
/// - Sides facing off the board must carry the frame sentinel.
/// - Interior-facing sides must carry a positive color.
/// - For each filled neighbor, the touching edge pair must agree.
///
/// Pure: reads the board, mutates nothing. Callers on the search path
/// account each invocation in their fit-check counter.
pub fn fits(board: &Board, row: usize, col: usize, edges: &[Color; 4]) -> bool {
    for side in Direction::ALL {
        let edge = edges[side.index()];
        match board.neighbor(row, col, side) {
            None => {
                // Facing the outer frame.
                if !edge.is_frame() {
                    return false;
                }
            }
            Some((nr, nc)) => {
                if edge.is_frame() {
                    return false;
                }
                if let Some(neighbor) = board.placement(nr, nc)
                    && neighbor.edge(side.opposite()) != edge
                {
                    return false;
                }
            }
        }
    }
    true
}
