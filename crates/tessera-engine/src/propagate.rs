//! AC-3 style propagation after a placement.
//!
//! Seeds a worklist with the empty neighbors of the placed cell, then
//! repeatedly re-filters popped cells against their currently-filled
//! neighbors. A cell that shrinks enqueues its own empty neighbors. Sound
//! (never removes a still-feasible placement) but deliberately incomplete:
//! it prunes, it does not solve.
//!
//! The caller is responsible for checkpointing the domain store before the
//! placement and restoring it on backtrack; all removals made here land on
//! the store's trail.

use std::collections::VecDeque;

use tessera_core::{Board, Direction, TileSet};

use crate::cache::DomainCache;
use crate::domain::{DomainStore, compute_cell_domain};
use crate::stats::Stats;

/// Prune the domains of cells affected by the placement at (row, col).
///
/// Returns `false` on a dead end (some empty cell lost its last
/// candidate), after incrementing the dead-end counter. When `enabled` is
/// off this is a no-op returning `true`: a benchmark knob, not a
/// correctness knob.
#[allow(clippy::too_many_arguments)]
pub fn propagate(
    board: &Board,
    tiles: &TileSet,
    domains: &mut DomainStore,
    cache: Option<&mut DomainCache>,
    stats: &mut Stats,
    row: usize,
    col: usize,
    enabled: bool,
) -> bool {
    if !enabled {
        return true;
    }

    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    let mut queued = vec![false; board.cell_count()];
    for side in Direction::ALL {
        if let Some((nr, nc)) = board.neighbor(row, col, side)
            && board.is_empty(nr, nc)
        {
            queue.push_back((nr, nc));
            queued[board.cell_index(nr, nc)] = true;
        }
    }

    let mut cache = cache;
    while let Some((r, c)) = queue.pop_front() {
        let idx = board.cell_index(r, c);
        queued[idx] = false;

        let outcome = match cache.as_deref_mut() {
            Some(cache) => {
                let placed = board.placed_count();
                match cache.probe(board.hash(), idx, placed) {
                    Some(target) => domains.shrink_to_target(r, c, &target),
                    None => {
                        let outcome = domains.refilter_cell(board, tiles, r, c, stats);
                        if let Some(domain) = domains.domain(r, c) {
                            cache.store(board.hash(), idx, placed, domain.clone());
                        }
                        outcome
                    }
                }
            }
            None => domains.refilter_cell(board, tiles, r, c, stats),
        };

        if outcome.emptied {
            stats.dead_ends += 1;
            return false;
        }
        if outcome.shrank {
            for side in Direction::ALL {
                if let Some((nr, nc)) = board.neighbor(r, c, side)
                    && board.is_empty(nr, nc)
                {
                    let nidx = board.cell_index(nr, nc);
                    if !queued[nidx] {
                        queue.push_back((nr, nc));
                        queued[nidx] = true;
                    }
                }
            }
        }
    }
    true
}

/// Recompute one cell's domain from scratch, consulting the cache when
/// one is supplied. Exposed for lazy recomputation outside propagation.
pub fn single_cell_domain(
    board: &Board,
    tiles: &TileSet,
    cache: Option<&mut DomainCache>,
    stats: &mut Stats,
    row: usize,
    col: usize,
) -> crate::domain::CellDomain {
    let idx = board.cell_index(row, col);
    let placed = board.placed_count();
    if let Some(cache) = cache {
        if let Some(domain) = cache.probe(board.hash(), idx, placed) {
            return domain;
        }
        let domain = compute_cell_domain(board, tiles, row, col, stats);
        cache.store(board.hash(), idx, placed, domain.clone());
        return domain;
    }
    compute_cell_domain(board, tiles, row, col, stats)
}
