//! Save/resume: periodic checkpoints of the placement history.
//!
//! A save file is a bincode body carrying the puzzle id, worker id,
//! generation counter, seed, cumulative elapsed time, and the placement
//! history. Writes go to a temp file, are flushed, then renamed into
//! place, so a crash never leaves a half-written save. The loader accepts
//! exactly its own prior output; anything inconsistent falls back to a
//! fresh search.

use std::fs::{self, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tessera_core::{Board, TileId, TileSet, fits};

use crate::config::AutosavePolicy;
use crate::error::{ReplayError, SaveError};
use crate::solver::HistoryEntry;

/// One history element in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPlacement {
    pub row: u16,
    pub col: u16,
    pub tile: u16,
    pub rotation: u8,
}

impl From<&HistoryEntry> for SavedPlacement {
    fn from(entry: &HistoryEntry) -> SavedPlacement {
        SavedPlacement {
            row: entry.row as u16,
            col: entry.col as u16,
            tile: entry.tile.get(),
            rotation: entry.rotation,
        }
    }
}

/// Everything needed to resume one worker's search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveState {
    pub puzzle: String,
    pub worker: u32,
    pub generation: u64,
    pub seed: u64,
    pub elapsed_ms: u64,
    pub history: Vec<SavedPlacement>,
}

/// Save file location for a (puzzle, worker) pair.
pub fn save_path(dir: &Path, puzzle: &str, worker: usize) -> PathBuf {
    dir.join(format!("{puzzle}-w{worker}.tsave"))
}

/// Write a save atomically: temp file, flush, rename.
pub fn write_save(dir: &Path, state: &SaveState) -> Result<(), SaveError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, &state.puzzle, state.worker as usize);
    let tmp = path.with_extension("tsave.tmp");
    let bytes = bincode::serialize(state)?;
    {
        let mut file = File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, &path)?;
    Ok(())
}

/// Load the save for a (puzzle, worker) pair, if one exists and decodes.
/// A corrupt file is logged and treated as absent.
pub fn load_save(dir: &Path, puzzle: &str, worker: usize) -> Option<SaveState> {
    let path = save_path(dir, puzzle, worker);
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read save file");
            return None;
        }
    };
    match bincode::deserialize::<SaveState>(&bytes) {
        Ok(state) => {
            debug!(
                path = %path.display(),
                generation = state.generation,
                depth = state.history.len(),
                "loaded save file"
            );
            Some(state)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt save file, ignoring");
            None
        }
    }
}

/// Replay a saved history onto a fresh board, validating every step.
///
/// Returns the history in working form; any inconsistency (unknown or
/// duplicated tile, unfittable placement) aborts with the reason so the
/// caller can fall back to a fresh start.
pub fn replay(
    board: &mut Board,
    tiles: &TileSet,
    history: &[SavedPlacement],
) -> Result<Vec<HistoryEntry>, ReplayError> {
    let mut entries = Vec::with_capacity(history.len());
    for saved in history {
        let (row, col) = (saved.row as usize, saved.col as usize);
        if row >= board.rows() || col >= board.cols() {
            return Err(ReplayError::OutOfBounds { row, col });
        }
        if !board.is_empty(row, col) {
            return Err(ReplayError::CellOccupied { row, col });
        }
        let id = TileId::new(saved.tile);
        let Some(tile) = tiles.get(id) else {
            return Err(ReplayError::UnknownTile { tile: id });
        };
        if board.is_used(id) {
            return Err(ReplayError::DuplicateTile { tile: id });
        }
        if !fits(board, row, col, tile.edges_rotated(saved.rotation as i32)) {
            return Err(ReplayError::Unfittable { row, col, tile: id });
        }
        board
            .place(row, col, tile, saved.rotation)
            .map_err(|_| ReplayError::Unfittable { row, col, tile: id })?;
        entries.push(HistoryEntry {
            row,
            col,
            tile: id,
            rotation: saved.rotation & 3,
        });
    }
    Ok(entries)
}

/// Autosave scheduling and execution for one worker.
#[derive(Debug)]
pub struct Autosaver {
    dir: PathBuf,
    puzzle: String,
    worker: usize,
    every_backtracks: u64,
    min_interval: Duration,
    generation: u64,
    last_save: Instant,
    backtracks_at_last_save: u64,
}

impl Autosaver {
    /// Autosaver following `policy` for one (puzzle, worker) pair.
    pub fn new(policy: &AutosavePolicy, puzzle: &str, worker: usize) -> Autosaver {
        Autosaver {
            dir: policy.dir.clone(),
            puzzle: puzzle.to_string(),
            worker,
            every_backtracks: policy.every_backtracks.max(1),
            min_interval: policy.every,
            generation: 0,
            last_save: Instant::now(),
            backtracks_at_last_save: 0,
        }
    }

    /// Continue the generation counter of a loaded save.
    pub fn resume_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Is a save due? Fires on the backtrack budget or the wall interval,
    /// whichever is hit first.
    pub fn due(&self, backtracks: u64) -> bool {
        backtracks.saturating_sub(self.backtracks_at_last_save) >= self.every_backtracks
            || self.last_save.elapsed() >= self.min_interval
    }

    /// Write the current history. Failures are logged, never fatal: the
    /// search continues without its checkpoint.
    pub fn save(&mut self, seed: u64, elapsed: Duration, history: &[HistoryEntry]) {
        self.generation += 1;
        let state = SaveState {
            puzzle: self.puzzle.clone(),
            worker: self.worker as u32,
            generation: self.generation,
            seed,
            elapsed_ms: elapsed.as_millis() as u64,
            history: history.iter().map(SavedPlacement::from).collect(),
        };
        match write_save(&self.dir, &state) {
            Ok(()) => {
                self.last_save = Instant::now();
                debug!(
                    worker = self.worker,
                    generation = self.generation,
                    depth = history.len(),
                    "autosaved"
                );
            }
            Err(e) => {
                warn!(worker = self.worker, error = %e, "autosave failed");
            }
        }
    }

    /// Reset the backtrack baseline after a save decision point.
    pub fn note_backtracks(&mut self, backtracks: u64) {
        self.backtracks_at_last_save = backtracks;
    }
}
