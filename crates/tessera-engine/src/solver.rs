//! The recursive backtracking core for one worker.
//!
//! Each recursion frame runs the same straight-line sequence: poll the
//! stop conditions, take a forced move if one exists, otherwise pick the
//! most constrained cell, then walk its ordered candidates: fit check,
//! trapped-gap veto, place, propagate, recurse, undo. Timeouts and
//! cancellation are plain `false` returns checked at every entry, never
//! exceptions; the only terminal outcomes are a solved board (true all
//! the way up) or an exhausted frame.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use tessera_core::{Board, EdgeIndex, FixedPiece, TileId, TileSet, fits};

use crate::cache::DomainCache;
use crate::config::SolverConfig;
use crate::control::SolveControl;
use crate::domain::{DomainCheckpoint, DomainStore};
use crate::error::ReplayError;
use crate::order::order_candidates;
use crate::propagate::propagate;
use crate::record::RecordTracker;
use crate::save::{Autosaver, SaveState, replay};
use crate::select::select_cell;
use crate::singleton::{SingletonScan, find_singleton};
use crate::stats::Stats;

/// One applied placement, in application order. Replaying the history
/// against a fresh board reproduces the current board exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub row: usize,
    pub col: usize,
    pub tile: TileId,
    pub rotation: u8,
}

/// A single worker's search state and recursion driver.
#[derive(Debug)]
pub struct Solver<'a> {
    tiles: &'a TileSet,
    edge_index: &'a EdgeIndex,
    cfg: &'a SolverConfig,
    control: &'a SolveControl,
    record: &'a RecordTracker,
    worker_id: usize,
    seed: u64,
    board: Board,
    domains: DomainStore,
    cache: Option<DomainCache>,
    stats: Stats,
    history: Vec<HistoryEntry>,
    /// Length of the pinned prefix (fixed pieces plus any corner
    /// diversification); the search never unwinds past it.
    fixed_len: usize,
    rng: StdRng,
    autosaver: Option<Autosaver>,
}

impl<'a> Solver<'a> {
    /// A fresh solver with the pinned placements applied and domains
    /// initialized. Fails if some pinned placement does not fit, i.e. the
    /// instance is unsolvable as posed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rows: usize,
        cols: usize,
        tiles: &'a TileSet,
        edge_index: &'a EdgeIndex,
        cfg: &'a SolverConfig,
        control: &'a SolveControl,
        record: &'a RecordTracker,
        worker_id: usize,
        seed: u64,
        pinned: &[FixedPiece],
        autosaver: Option<Autosaver>,
    ) -> Result<Solver<'a>, ReplayError> {
        let mut solver = Solver {
            tiles,
            edge_index,
            cfg,
            control,
            record,
            worker_id,
            seed,
            board: Board::new(rows, cols, tiles.max_id()),
            domains: DomainStore::new(rows, cols),
            cache: cfg
                .use_domain_cache
                .then(|| DomainCache::new(DomainCache::DEFAULT_SLOTS)),
            stats: Stats::new(),
            history: Vec::with_capacity(rows * cols),
            fixed_len: 0,
            rng: StdRng::seed_from_u64(seed),
            autosaver,
        };
        for piece in pinned {
            solver.pin(piece)?;
        }
        solver.fixed_len = solver.history.len();
        solver
            .domains
            .initialize(&solver.board, tiles, &mut solver.stats);
        Ok(solver)
    }

    /// A solver resumed from a save file: the pinned placements must form
    /// a prefix of the saved history, which is replayed in full.
    #[allow(clippy::too_many_arguments)]
    pub fn resumed(
        rows: usize,
        cols: usize,
        tiles: &'a TileSet,
        edge_index: &'a EdgeIndex,
        cfg: &'a SolverConfig,
        control: &'a SolveControl,
        record: &'a RecordTracker,
        worker_id: usize,
        pinned: &[FixedPiece],
        save: &SaveState,
        mut autosaver: Option<Autosaver>,
    ) -> Result<Solver<'a>, ReplayError> {
        if save.history.len() < pinned.len() {
            return Err(ReplayError::FixedPrefixMismatch);
        }
        for (saved, piece) in save.history.iter().zip(pinned) {
            if (saved.row as usize, saved.col as usize, saved.tile, saved.rotation & 3)
                != (piece.row, piece.col, piece.tile.get(), piece.rotation & 3)
            {
                return Err(ReplayError::FixedPrefixMismatch);
            }
        }

        let mut board = Board::new(rows, cols, tiles.max_id());
        let history = replay(&mut board, tiles, &save.history)?;
        if let Some(saver) = autosaver.as_mut() {
            saver.resume_generation(save.generation);
        }

        let mut solver = Solver {
            tiles,
            edge_index,
            cfg,
            control,
            record,
            worker_id,
            seed: save.seed,
            board,
            domains: DomainStore::new(rows, cols),
            cache: cfg
                .use_domain_cache
                .then(|| DomainCache::new(DomainCache::DEFAULT_SLOTS)),
            stats: Stats::new(),
            history,
            fixed_len: pinned.len(),
            rng: StdRng::seed_from_u64(save.seed),
            autosaver,
        };
        solver
            .domains
            .initialize(&solver.board, tiles, &mut solver.stats);
        // The replayed depth counts as reached, even if the search below
        // it exhausts and unwinds.
        solver.record.offer(worker_id, &solver.board);
        info!(
            worker = worker_id,
            depth = solver.history.len(),
            generation = save.generation,
            "resumed from save"
        );
        Ok(solver)
    }

    /// Run the search to completion: solved, exhausted, timed out, or
    /// canceled. Returns `true` only for a solution found by this worker.
    pub fn run(&mut self) -> bool {
        loop {
            if self.search() {
                return true;
            }
            if self.control.should_stop(0) {
                return false;
            }
            if self.history.len() <= self.fixed_len {
                // Root exhausted: the instance has no solution below the
                // pinned prefix.
                return false;
            }
            // A resumed search exhausted the subtree below its replayed
            // frontier: unwind one replayed placement, permanently retire
            // that branch, and continue from the shallower state.
            let entry = self
                .history
                .pop()
                .expect("non-empty history checked above");
            self.board.remove(entry.row, entry.col);
            self.stats.backtracks += 1;
            self.domains
                .initialize(&self.board, self.tiles, &mut self.stats);
            self.domains
                .remove_candidate(entry.row, entry.col, entry.tile, entry.rotation);
            debug!(
                worker = self.worker_id,
                depth = self.history.len(),
                "unwound replayed placement"
            );
        }
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The placement history, pinned prefix included.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// This worker's counters.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Length of the pinned prefix.
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    // ── Recursion ────────────────────────────────────────────────────────

    fn search(&mut self) -> bool {
        self.stats.recursive_calls += 1;
        if self.control.should_stop(self.stats.recursive_calls) {
            return false;
        }

        if self.cfg.use_singletons {
            match find_singleton(
                &self.board,
                self.tiles,
                &self.domains,
                self.cfg.use_ac3,
                &mut self.stats,
            ) {
                SingletonScan::DeadTile(_) => return false,
                SingletonScan::Forced(forced) => {
                    let Some(mark) =
                        self.place(forced.row, forced.col, forced.tile, forced.rotation)
                    else {
                        return false;
                    };
                    self.maybe_autosave();
                    if self.search() {
                        return true;
                    }
                    self.undo(mark);
                    self.stats.backtracks += 1;
                    return false;
                }
                SingletonScan::Nothing => {}
            }
        }

        let Some((row, col)) = select_cell(&self.board, &self.domains, self.cfg) else {
            // Every cell is filled and every placement passed its fit
            // check on the way in: solved.
            self.control.mark_solved();
            self.record.offer(self.worker_id, &self.board);
            info!(
                worker = self.worker_id,
                depth = self.board.placed_count(),
                "solution found"
            );
            return true;
        };

        let depth = self.board.placed_count();
        let candidates = order_candidates(
            &self.board,
            self.tiles,
            self.edge_index,
            &self.domains,
            row,
            col,
            self.cfg,
            &mut self.rng,
            &mut self.stats,
        );
        self.stats.register_options(depth, candidates.len() as u64);

        for candidate in candidates {
            if self.control.should_stop(self.stats.recursive_calls) {
                return false;
            }
            if candidate.freedom.is_none() {
                // Lookahead found a neighbor this candidate would strangle.
                self.stats.forward_check_rejects += 1;
                self.stats.option_explored(depth);
                continue;
            }
            let Some(mark) = self.place(row, col, candidate.tile, candidate.rotation) else {
                self.stats.option_explored(depth);
                continue;
            };
            self.maybe_autosave();
            if self.search() {
                return true;
            }
            self.undo(mark);
            self.stats.backtracks += 1;
            self.stats.option_explored(depth);
        }
        false
    }

    /// Fit-check, place, bookkeep, and propagate one placement.
    ///
    /// On success returns the checkpoint that [`Self::undo`] needs; on a
    /// failed fit or a propagation dead end the board and domains are
    /// already back to their prior state.
    fn place(
        &mut self,
        row: usize,
        col: usize,
        tile_id: TileId,
        rotation: u8,
    ) -> Option<DomainCheckpoint> {
        let Some(tile) = self.tiles.get(tile_id) else {
            return None;
        };
        self.stats.fit_checks += 1;
        if !fits(&self.board, row, col, tile.edges_rotated(rotation as i32)) {
            self.stats.forward_check_rejects += 1;
            return None;
        }
        let mark = self.domains.checkpoint();
        if let Err(e) = self.board.place(row, col, tile, rotation) {
            // Unreachable after the fit check unless bookkeeping is
            // broken; debug builds have already panicked.
            warn!(worker = self.worker_id, error = %e, "placement rejected");
            return None;
        }
        self.history.push(HistoryEntry {
            row,
            col,
            tile: tile_id,
            rotation,
        });
        self.domains.detach_cell(row, col);
        self.domains.retire_tile(tile_id);
        self.stats.placements += 1;

        if !propagate(
            &self.board,
            self.tiles,
            &mut self.domains,
            self.cache.as_mut(),
            &mut self.stats,
            row,
            col,
            self.cfg.use_ac3,
        ) {
            self.undo(mark);
            return None;
        }

        let outcome = self.record.offer(self.worker_id, &self.board);
        if (outcome.depth_record || outcome.score_record) && self.cfg.verbose {
            let depth = self.board.placed_count();
            if self
                .record
                .should_show(depth, outcome.depth_record, outcome.score_record)
            {
                let score = self.board.calculate_score();
                info!(
                    worker = self.worker_id,
                    depth,
                    score = score.matched,
                    "new record"
                );
            }
        }
        Some(mark)
    }

    /// Undo the most recent placement and restore domains to `mark`.
    fn undo(&mut self, mark: DomainCheckpoint) {
        let entry = self
            .history
            .pop()
            .expect("undo with empty placement history");
        self.board.remove(entry.row, entry.col);
        self.domains.restore(mark);
    }

    /// Apply one pinned placement before the search starts.
    fn pin(&mut self, piece: &FixedPiece) -> Result<(), ReplayError> {
        let Some(tile) = self.tiles.get(piece.tile) else {
            return Err(ReplayError::UnknownTile { tile: piece.tile });
        };
        if self.board.is_used(piece.tile) {
            return Err(ReplayError::DuplicateTile { tile: piece.tile });
        }
        if !self.board.is_empty(piece.row, piece.col) {
            return Err(ReplayError::CellOccupied {
                row: piece.row,
                col: piece.col,
            });
        }
        self.stats.fit_checks += 1;
        if !fits(
            &self.board,
            piece.row,
            piece.col,
            tile.edges_rotated(piece.rotation as i32),
        ) {
            return Err(ReplayError::Unfittable {
                row: piece.row,
                col: piece.col,
                tile: piece.tile,
            });
        }
        self.board
            .place(piece.row, piece.col, tile, piece.rotation)
            .map_err(|_| ReplayError::Unfittable {
                row: piece.row,
                col: piece.col,
                tile: piece.tile,
            })?;
        self.history.push(HistoryEntry {
            row: piece.row,
            col: piece.col,
            tile: piece.tile,
            rotation: piece.rotation & 3,
        });
        self.stats.placements += 1;
        Ok(())
    }

    fn maybe_autosave(&mut self) {
        let Some(saver) = self.autosaver.as_mut() else {
            return;
        };
        if !saver.due(self.stats.backtracks) {
            return;
        }
        saver.save(self.seed, self.control.elapsed(), &self.history);
        saver.note_backtracks(self.stats.backtracks);
    }
}
