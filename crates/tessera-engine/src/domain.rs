//! Per-cell domains of legal oriented placements, with trail-based undo.
//!
//! Restoration uses an undo log rather than deep snapshots: every mutation
//! pushes its exact inverse (with positional indices) onto a trail, a
//! checkpoint is a trail mark, and restore pops back to the mark. Because
//! the ops are inverted in LIFO order at their recorded indices, the
//! restored state is bit-equivalent to the pre-checkpoint state.

use arrayvec::ArrayVec;
use tessera_core::{Board, TileId, TileSet, fits};

use crate::stats::Stats;

/// Rotations a tile can take at one cell (at most four).
pub type Rotations = ArrayVec<u8, 4>;

/// One tile's legal rotations at one cell. Never carries an empty
/// rotation list; an entry that loses its last rotation is removed whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub tile: TileId,
    pub rotations: Rotations,
}

/// The set of currently-legal oriented placements at one empty cell,
/// ordered by tile insertion (ascending id for freshly computed domains).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellDomain {
    entries: Vec<DomainEntry>,
}

impl CellDomain {
    /// Number of candidate tiles.
    pub fn tile_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of candidate (tile, rotation) pairs.
    pub fn placement_count(&self) -> usize {
        self.entries.iter().map(|e| e.rotations.len()).sum()
    }

    /// Whether no placement is legal here, a dead end.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries, in order.
    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    /// Whether `tile` is still a candidate.
    pub fn contains(&self, tile: TileId) -> bool {
        self.position(tile).is_some()
    }

    /// If exactly one oriented placement remains, return it.
    pub fn single(&self) -> Option<(TileId, u8)> {
        match self.entries.as_slice() {
            [entry] if entry.rotations.len() == 1 => Some((entry.tile, entry.rotations[0])),
            _ => None,
        }
    }

    fn position(&self, tile: TileId) -> Option<usize> {
        self.entries.iter().position(|e| e.tile == tile)
    }
}

/// A trail mark; restoring rewinds all mutations made after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainCheckpoint(usize);

/// Inverse records for domain mutations.
#[derive(Debug)]
enum TrailOp {
    /// A whole entry was removed from `cell` at `index`.
    EntryRemoved {
        cell: usize,
        index: usize,
        entry: DomainEntry,
    },
    /// One rotation was removed from the entry at `index` in `cell`.
    RotationRemoved {
        cell: usize,
        index: usize,
        rot_index: usize,
        rotation: u8,
    },
    /// A cell's whole domain was detached because the cell was filled.
    CellFilled { cell: usize, domain: CellDomain },
}

/// Outcome of re-filtering one cell's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefilterOutcome {
    /// At least one candidate was removed.
    pub shrank: bool,
    /// The domain is now empty, a dead end.
    pub emptied: bool,
}

/// All per-cell domains for one worker's board.
///
/// Only empty cells carry a domain; filling a cell detaches its domain
/// onto the trail, and restoring re-attaches it.
#[derive(Debug)]
pub struct DomainStore {
    cols: usize,
    domains: Vec<Option<CellDomain>>,
    trail: Vec<TrailOp>,
}

impl DomainStore {
    /// A store with no domains computed yet.
    pub fn new(rows: usize, cols: usize) -> DomainStore {
        DomainStore {
            cols,
            domains: vec![None; rows * cols],
            trail: Vec::new(),
        }
    }

    /// Compute, from scratch, the domain of every empty cell of `board`.
    /// Clears the trail: the resulting state is the new baseline.
    ///
    /// On an already-unsolvable board this leaves at least one cell with
    /// an empty domain; callers inspect domains to detect that.
    pub fn initialize(&mut self, board: &Board, tiles: &TileSet, stats: &mut Stats) {
        self.trail.clear();
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                let idx = board.cell_index(row, col);
                self.domains[idx] = if board.is_empty(row, col) {
                    Some(compute_cell_domain(board, tiles, row, col, stats))
                } else {
                    None
                };
            }
        }
    }

    /// The domain of an empty cell, or `None` for a filled cell.
    pub fn domain(&self, row: usize, col: usize) -> Option<&CellDomain> {
        self.domains[row * self.cols + col].as_ref()
    }

    /// Mark the current trail position.
    pub fn checkpoint(&self) -> DomainCheckpoint {
        DomainCheckpoint(self.trail.len())
    }

    /// Rewind every mutation made after `mark`.
    pub fn restore(&mut self, mark: DomainCheckpoint) {
        while self.trail.len() > mark.0 {
            let op = self
                .trail
                .pop()
                .expect("trail shorter than its own checkpoint");
            match op {
                TrailOp::EntryRemoved { cell, index, entry } => {
                    let domain = self.domains[cell]
                        .as_mut()
                        .expect("trail references a detached cell");
                    domain.entries.insert(index, entry);
                }
                TrailOp::RotationRemoved {
                    cell,
                    index,
                    rot_index,
                    rotation,
                } => {
                    let domain = self.domains[cell]
                        .as_mut()
                        .expect("trail references a detached cell");
                    domain.entries[index].rotations.insert(rot_index, rotation);
                }
                TrailOp::CellFilled { cell, domain } => {
                    self.domains[cell] = Some(domain);
                }
            }
        }
    }

    /// Detach the domain of a cell that was just filled.
    pub fn detach_cell(&mut self, row: usize, col: usize) {
        let cell = row * self.cols + col;
        if let Some(domain) = self.domains[cell].take() {
            self.trail.push(TrailOp::CellFilled { cell, domain });
        }
    }

    /// Remove `tile` from every cell's domain (it was just placed).
    pub fn retire_tile(&mut self, tile: TileId) {
        for cell in 0..self.domains.len() {
            let Some(domain) = self.domains[cell].as_mut() else {
                continue;
            };
            if let Some(index) = domain.position(tile) {
                let entry = domain.entries.remove(index);
                self.trail.push(TrailOp::EntryRemoved { cell, index, entry });
            }
        }
    }

    /// Drop one oriented candidate from a cell. Used when resume
    /// unwinding permanently retires an already-explored branch.
    pub fn remove_candidate(&mut self, row: usize, col: usize, tile: TileId, rotation: u8) {
        let cell = row * self.cols + col;
        let Some(domain) = self.domains[cell].as_mut() else {
            return;
        };
        let Some(index) = domain.position(tile) else {
            return;
        };
        let entry = &mut domain.entries[index];
        if entry.rotations.len() == 1 {
            if entry.rotations[0] == rotation {
                let entry = domain.entries.remove(index);
                self.trail.push(TrailOp::EntryRemoved { cell, index, entry });
            }
        } else if let Some(rot_index) = entry.rotations.iter().position(|&r| r == rotation) {
            entry.rotations.remove(rot_index);
            self.trail.push(TrailOp::RotationRemoved {
                cell,
                index,
                rot_index,
                rotation,
            });
        }
    }

    /// Re-filter one cell's domain against its currently-filled
    /// neighbors, dropping candidates that no longer fit. Shrink-only.
    pub fn refilter_cell(
        &mut self,
        board: &Board,
        tiles: &TileSet,
        row: usize,
        col: usize,
        stats: &mut Stats,
    ) -> RefilterOutcome {
        let cell = row * self.cols + col;
        let DomainStore { domains, trail, .. } = self;
        let Some(domain) = domains[cell].as_mut() else {
            return RefilterOutcome {
                shrank: false,
                emptied: false,
            };
        };
        let mut shrank = false;
        // Reverse scan: removals never shift the indices still to visit,
        // so recorded indices are exact for the LIFO rewind.
        for index in (0..domain.entries.len()).rev() {
            let entry = &domain.entries[index];
            let Some(tile) = tiles.get(entry.tile) else {
                continue;
            };
            let mut dead: ArrayVec<usize, 4> = ArrayVec::new();
            for (rot_index, &rotation) in entry.rotations.iter().enumerate() {
                stats.fit_checks += 1;
                if !fits(board, row, col, tile.edges_rotated(rotation as i32)) {
                    dead.push(rot_index);
                }
            }
            if dead.is_empty() {
                continue;
            }
            shrank = true;
            if dead.len() == entry.rotations.len() {
                let entry = domain.entries.remove(index);
                trail.push(TrailOp::EntryRemoved { cell, index, entry });
            } else {
                let entry = &mut domain.entries[index];
                for &rot_index in dead.iter().rev() {
                    let rotation = entry.rotations.remove(rot_index);
                    trail.push(TrailOp::RotationRemoved {
                        cell,
                        index,
                        rot_index,
                        rotation,
                    });
                }
            }
        }
        RefilterOutcome {
            shrank,
            emptied: domain.entries.is_empty(),
        }
    }

    /// Shrink one cell's domain to `target`, removing anything absent
    /// from it. Used when the domain cache already knows the answer.
    pub fn shrink_to_target(
        &mut self,
        row: usize,
        col: usize,
        target: &CellDomain,
    ) -> RefilterOutcome {
        let cell = row * self.cols + col;
        let DomainStore { domains, trail, .. } = self;
        let Some(domain) = domains[cell].as_mut() else {
            return RefilterOutcome {
                shrank: false,
                emptied: false,
            };
        };
        let mut shrank = false;
        for index in (0..domain.entries.len()).rev() {
            let tile = domain.entries[index].tile;
            match target.entries.iter().find(|e| e.tile == tile) {
                None => {
                    shrank = true;
                    let entry = domain.entries.remove(index);
                    trail.push(TrailOp::EntryRemoved { cell, index, entry });
                }
                Some(kept) => {
                    let entry = &mut domain.entries[index];
                    for rot_index in (0..entry.rotations.len()).rev() {
                        let rotation = entry.rotations[rot_index];
                        if !kept.rotations.contains(&rotation) {
                            shrank = true;
                            entry.rotations.remove(rot_index);
                            trail.push(TrailOp::RotationRemoved {
                                cell,
                                index,
                                rot_index,
                                rotation,
                            });
                        }
                    }
                    if domain.entries[index].rotations.is_empty() {
                        shrank = true;
                        let entry = domain.entries.remove(index);
                        trail.push(TrailOp::EntryRemoved { cell, index, entry });
                    }
                }
            }
        }
        RefilterOutcome {
            shrank,
            emptied: domain.entries.is_empty(),
        }
    }

    /// Snapshot every current domain. Used only by equivalence tests.
    pub fn domains_snapshot(&self) -> Vec<Option<CellDomain>> {
        self.domains.clone()
    }
}

/// Enumerate the legal oriented placements of every unused tile at one
/// cell. Only distinct rotations are tried, so symmetric tiles never
/// produce duplicate oriented candidates.
pub fn compute_cell_domain(
    board: &Board,
    tiles: &TileSet,
    row: usize,
    col: usize,
    stats: &mut Stats,
) -> CellDomain {
    let mut entries = Vec::new();
    for tile in tiles.iter() {
        if board.is_used(tile.id()) {
            continue;
        }
        let mut rotations = Rotations::new();
        for rotation in 0..tile.distinct_rotations() {
            stats.fit_checks += 1;
            if fits(board, row, col, tile.edges_rotated(rotation as i32)) {
                rotations.push(rotation);
            }
        }
        if !rotations.is_empty() {
            entries.push(DomainEntry {
                tile: tile.id(),
                rotations,
            });
        }
    }
    CellDomain { entries }
}
