//! Next-cell selection: minimum remaining values with tie-breaks.

use tessera_core::{Board, Direction};

use crate::config::SolverConfig;
use crate::domain::DomainStore;

/// Divisor of the gap-on-border rule: a cell with no filled neighbors is
/// demoted against one with some when its candidate count exceeds the
/// other's divided by this. Tuned together with the border tie-break.
const GAP_RULE_DIV: usize = 2;

#[derive(Debug, Clone, Copy)]
struct CandidateCell {
    row: usize,
    col: usize,
    count: usize,
    filled_neighbors: usize,
    is_border: bool,
    adjacent_filled_border: bool,
}

/// Pick the next empty cell to fill, or `None` when the board is full.
///
/// Primary key: fewest candidate tiles remaining. Ties fall to the cell
/// with more filled orthogonal neighbors, then (when border priority is
/// on) to frame cells, preferring those adjacent to an already-filled
/// frame cell, and finally to row-major order. Read-only.
pub fn select_cell(
    board: &Board,
    domains: &DomainStore,
    cfg: &SolverConfig,
) -> Option<(usize, usize)> {
    let mut best: Option<CandidateCell> = None;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if !board.is_empty(row, col) {
                continue;
            }
            let candidate = describe(board, domains, row, col);
            best = match best {
                None => Some(candidate),
                Some(current) => {
                    if prefer(&candidate, &current, cfg.prioritize_borders) {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            };
        }
    }
    best.map(|c| (c.row, c.col))
}

fn describe(board: &Board, domains: &DomainStore, row: usize, col: usize) -> CandidateCell {
    let count = domains.domain(row, col).map_or(0, |d| d.tile_count());
    let mut filled_neighbors = 0;
    let mut adjacent_filled_border = false;
    let is_border =
        row == 0 || col == 0 || row == board.rows() - 1 || col == board.cols() - 1;
    for side in Direction::ALL {
        if let Some((nr, nc)) = board.neighbor(row, col, side)
            && !board.is_empty(nr, nc)
        {
            filled_neighbors += 1;
            let neighbor_on_border =
                nr == 0 || nc == 0 || nr == board.rows() - 1 || nc == board.cols() - 1;
            if is_border && neighbor_on_border {
                adjacent_filled_border = true;
            }
        }
    }
    CandidateCell {
        row,
        col,
        count,
        filled_neighbors,
        is_border,
        adjacent_filled_border,
    }
}

/// Is `a` a strictly better choice than `b`? Equal cells keep `b`, which
/// the row-major scan visits first.
fn prefer(a: &CandidateCell, b: &CandidateCell, borders: bool) -> bool {
    if borders {
        // Gap rule: an isolated cell only beats a connected one when its
        // domain is at most half the size; otherwise picking it splits
        // the frame fill into disconnected runs that trap single holes.
        if a.filled_neighbors > 0 && b.filled_neighbors == 0 && b.count * GAP_RULE_DIV > a.count
        {
            return true;
        }
        if b.filled_neighbors > 0 && a.filled_neighbors == 0 && a.count * GAP_RULE_DIV > b.count
        {
            return false;
        }
    }
    if a.count != b.count {
        return a.count < b.count;
    }
    if a.filled_neighbors != b.filled_neighbors {
        return a.filled_neighbors > b.filled_neighbors;
    }
    if borders {
        if a.is_border != b.is_border {
            return a.is_border;
        }
        if a.is_border && a.adjacent_filled_border != b.adjacent_filled_border {
            return a.adjacent_filled_border;
        }
    }
    false
}
