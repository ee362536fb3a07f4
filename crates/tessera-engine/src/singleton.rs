//! Forced-move detection: cells or tiles with exactly one legal placement.

use tessera_core::{Board, TileId, TileSet, fits};

use crate::domain::DomainStore;
use crate::stats::Stats;

/// A placement with no alternative; applying it loses nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedMove {
    pub row: usize,
    pub col: usize,
    pub tile: TileId,
    pub rotation: u8,
}

/// Outcome of one singleton scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingletonScan {
    /// A forced move was found; apply it and rescan.
    Forced(ForcedMove),
    /// Some unused tile fits nowhere: the whole branch is dead.
    DeadTile(TileId),
    /// Nothing forced. Not an error, just a signal.
    Nothing,
}

/// Scan every empty cell and every unused tile for a forced move.
///
/// Cell side: a domain holding exactly one oriented placement. Tile side:
/// an unused tile with exactly one (cell, rotation) where it fits; a tile
/// that fits nowhere is reported as a dead end, a stronger signal than a
/// starved cell because no future assignment can absorb the tile.
///
/// Returns the first singleton found; after the caller applies it, the
/// next scan surfaces any others. When `use_domains` is off (propagation
/// disabled, domains stale) the tile side rechecks fits from scratch.
pub fn find_singleton(
    board: &Board,
    tiles: &TileSet,
    domains: &DomainStore,
    use_domains: bool,
    stats: &mut Stats,
) -> SingletonScan {
    // Cell side first: domains make it nearly free.
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if !board.is_empty(row, col) {
                continue;
            }
            if let Some(domain) = domains.domain(row, col)
                && let Some((tile, rotation)) = domain.single()
            {
                stats.singletons_found += 1;
                return SingletonScan::Forced(ForcedMove {
                    row,
                    col,
                    tile,
                    rotation,
                });
            }
        }
    }

    // Tile side: tally each unused tile's options in one pass, then walk
    // the tiles in set order so both paths report the same first finding.
    let mut options: Vec<(u32, Option<ForcedMove>)> =
        vec![(0, None); tiles.max_id() as usize + 1];
    if use_domains {
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                let Some(domain) = domains.domain(row, col) else {
                    continue;
                };
                for entry in domain.entries() {
                    let slot = &mut options[entry.tile.get() as usize];
                    slot.0 += entry.rotations.len() as u32;
                    if slot.1.is_none() {
                        slot.1 = Some(ForcedMove {
                            row,
                            col,
                            tile: entry.tile,
                            rotation: entry.rotations[0],
                        });
                    }
                }
            }
        }
    } else {
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if !board.is_empty(row, col) {
                    continue;
                }
                for tile in tiles.iter() {
                    if board.is_used(tile.id()) {
                        continue;
                    }
                    for rotation in 0..tile.distinct_rotations() {
                        stats.fit_checks += 1;
                        if fits(board, row, col, tile.edges_rotated(rotation as i32)) {
                            let slot = &mut options[tile.id().get() as usize];
                            slot.0 += 1;
                            if slot.1.is_none() {
                                slot.1 = Some(ForcedMove {
                                    row,
                                    col,
                                    tile: tile.id(),
                                    rotation,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    for tile in tiles.iter() {
        if board.is_used(tile.id()) {
            continue;
        }
        match options[tile.id().get() as usize] {
            (0, _) => {
                stats.dead_ends += 1;
                return SingletonScan::DeadTile(tile.id());
            }
            (1, Some(forced)) => {
                stats.singletons_found += 1;
                return SingletonScan::Forced(forced);
            }
            _ => {}
        }
    }

    SingletonScan::Nothing
}
