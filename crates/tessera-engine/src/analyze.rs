//! Trapped-gap lookahead: would a candidate placement strangle a neighbor?
//!
//! For each empty neighbor of the candidate cell, counts the oriented
//! placements of unused tiles that would still fit there with the
//! candidate hypothetically in place. A neighbor with zero options vetoes
//! the candidate; the summed counts double as the least-constraining-value
//! signal. Cheaper and earlier than full propagation, which it partly
//! duplicates on purpose.

use tessera_core::{Board, Color, Direction, TileId, TileSet};

use crate::domain::DomainStore;
use crate::stats::Stats;

/// Count each empty neighbor's remaining options under the hypothesis
/// that `(row, col)` holds a tile presenting `cand_edges`.
///
/// Returns `None` when some neighbor would be left with zero options (the
/// candidate must be vetoed), otherwise the total option count across
/// neighbors; higher means less constraining.
///
/// When `domains` is supplied the count filters each neighbor's current
/// domain by the single new edge constraint; without it (propagation
/// disabled, domains stale) every unused tile is re-checked from scratch.
#[allow(clippy::too_many_arguments)]
pub fn neighbor_freedom(
    board: &Board,
    tiles: &TileSet,
    domains: Option<&DomainStore>,
    row: usize,
    col: usize,
    cand_tile: TileId,
    cand_edges: &[Color; 4],
    stats: &mut Stats,
) -> Option<u64> {
    let mut total: u64 = 0;
    for side in Direction::ALL {
        let Some((nr, nc)) = board.neighbor(row, col, side) else {
            continue;
        };
        if !board.is_empty(nr, nc) {
            continue;
        }
        let needed = cand_edges[side.index()];
        let facing = side.opposite();
        let count = match domains.and_then(|d| d.domain(nr, nc)) {
            Some(domain) => {
                let mut count: u64 = 0;
                for entry in domain.entries() {
                    if entry.tile == cand_tile {
                        continue;
                    }
                    let Some(tile) = tiles.get(entry.tile) else {
                        continue;
                    };
                    for &rotation in &entry.rotations {
                        if tile.edge(rotation, facing) == needed {
                            count += 1;
                        }
                    }
                }
                count
            }
            None => raw_count(board, tiles, nr, nc, (row, col), cand_tile, cand_edges, stats),
        };
        if count == 0 {
            return None;
        }
        total += count;
    }
    Some(total)
}

/// Count fitting placements at (row, col) with no domain to lean on,
/// substituting the hypothetical placement for its still-empty cell.
#[allow(clippy::too_many_arguments)]
fn raw_count(
    board: &Board,
    tiles: &TileSet,
    row: usize,
    col: usize,
    hyp_cell: (usize, usize),
    hyp_tile: TileId,
    hyp_edges: &[Color; 4],
    stats: &mut Stats,
) -> u64 {
    let mut count = 0;
    for tile in tiles.iter() {
        if tile.id() == hyp_tile || board.is_used(tile.id()) {
            continue;
        }
        for rotation in 0..tile.distinct_rotations() {
            stats.fit_checks += 1;
            if fits_assuming(
                board,
                row,
                col,
                tile.edges_rotated(rotation as i32),
                hyp_cell,
                hyp_edges,
            ) {
                count += 1;
            }
        }
    }
    count
}

/// Like [`tessera_core::fits`], but treats `hyp_cell` as holding
/// `hyp_edges`.
fn fits_assuming(
    board: &Board,
    row: usize,
    col: usize,
    edges: &[Color; 4],
    hyp_cell: (usize, usize),
    hyp_edges: &[Color; 4],
) -> bool {
    for side in Direction::ALL {
        let edge = edges[side.index()];
        match board.neighbor(row, col, side) {
            None => {
                if !edge.is_frame() {
                    return false;
                }
            }
            Some((nr, nc)) => {
                if edge.is_frame() {
                    return false;
                }
                if (nr, nc) == hyp_cell {
                    if hyp_edges[side.opposite().index()] != edge {
                        return false;
                    }
                } else if let Some(neighbor) = board.placement(nr, nc)
                    && neighbor.edge(side.opposite()) != edge
                {
                    return false;
                }
            }
        }
    }
    true
}
