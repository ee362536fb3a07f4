//! Worker orchestration: spawn N independent searches over shared
//! immutable tiles, with corner diversification and a progress monitor.
//!
//! Workers share only the solved flag, the record tracker, and the
//! relaxed statistics aggregate: no locks on the hot path, no work
//! stealing. Worker 0 runs on the calling thread; helpers run on scoped
//! OS threads that join when the scope closes. Hangs are impossible
//! in-model (every worker polls the stop conditions at recursion entry),
//! so the join bound is realized cooperatively: the monitor trips the
//! stop flag once the wall deadline is comfortably past.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use tessera_core::{Board, EdgeIndex, FixedPiece, Puzzle, TileKind, fits};

use crate::config::SolverConfig;
use crate::control::SolveControl;
use crate::record::{BestSnapshot, RecordTracker};
use crate::save::{Autosaver, SaveState, load_save, replay};
use crate::solver::Solver;
use crate::stats::{SharedStats, Stats};

/// Tile counts at or below this skip corner diversification: the search
/// is short enough that identical starts cost nothing.
const DIVERSIFY_MIN_UNUSED: usize = 10;

/// One worker's end-of-run summary.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub worker: usize,
    pub stats: Stats,
    pub found_solution: bool,
}

/// Result of an end-to-end solve.
#[derive(Debug)]
pub struct SolveOutcome {
    /// Some worker completed the board.
    pub solved: bool,
    /// The best board any worker reached (the solution when solved).
    pub best: Option<BestSnapshot>,
    /// Deepest depth reached across workers (monotone record value).
    pub best_depth: usize,
    /// Highest partial score reached across workers.
    pub best_score: usize,
    /// Counters aggregated across workers.
    pub totals: Stats,
    /// Per-worker counters, ordered by worker id.
    pub per_worker: Vec<WorkerReport>,
    /// Wall time of this run.
    pub elapsed: Duration,
}

/// Solve a puzzle with the configured worker fan-out.
pub fn solve(puzzle: &Puzzle, cfg: &SolverConfig) -> SolveOutcome {
    let cfg = cfg.clone().normalized();
    let start = Instant::now();
    let edge_index = EdgeIndex::build(puzzle.tiles());
    let solved = Arc::new(AtomicBool::new(false));
    let record = RecordTracker::new(
        puzzle.rows() * puzzle.cols(),
        cfg.min_depth_to_show_records,
    );
    let shared = SharedStats::new();
    let done = AtomicUsize::new(0);
    let workers = cfg.thread_count;

    let mut reports: Vec<WorkerReport> = Vec::with_capacity(workers);
    std::thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers.saturating_sub(1));
        for worker_id in 1..workers {
            let solved = Arc::clone(&solved);
            let edge_index = &edge_index;
            let cfg = &cfg;
            let record = &record;
            let shared = &shared;
            let done = &done;
            handles.push(s.spawn(move || {
                run_worker(worker_id, puzzle, edge_index, cfg, solved, record, shared, done)
            }));
        }

        {
            let solved = Arc::clone(&solved);
            let record = &record;
            let done = &done;
            let cfg = &cfg;
            s.spawn(move || monitor(cfg, workers, solved, record, done));
        }

        // Worker 0 runs here, on the calling thread.
        reports.push(run_worker(
            0,
            puzzle,
            &edge_index,
            &cfg,
            Arc::clone(&solved),
            &record,
            &shared,
            &done,
        ));
        for handle in handles {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => warn!("worker thread panicked"),
            }
        }
    });

    reports.sort_by_key(|r| r.worker);
    SolveOutcome {
        solved: reports.iter().any(|r| r.found_solution),
        best: record.snapshot(),
        best_depth: record.max_depth(),
        best_score: record.best_score(),
        totals: shared.snapshot(),
        per_worker: reports,
        elapsed: start.elapsed(),
    }
}

/// Per-worker seed: a golden-ratio stride keeps the streams apart even
/// for base entropy zero.
fn worker_seed(base: u64, worker_id: usize) -> u64 {
    base.wrapping_add((worker_id as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    worker_id: usize,
    puzzle: &Puzzle,
    edge_index: &EdgeIndex,
    cfg: &SolverConfig,
    solved: Arc<AtomicBool>,
    record: &RecordTracker,
    shared: &SharedStats,
    done: &AtomicUsize,
) -> WorkerReport {
    let seed = worker_seed(cfg.random_seed, worker_id);
    let pinned = pinned_plan(puzzle, worker_id);
    let saved = cfg
        .autosave
        .as_ref()
        .and_then(|policy| load_save(&policy.dir, puzzle.name(), worker_id))
        .filter(|save| validate_save(puzzle, &pinned, save, worker_id));

    let control = match &saved {
        Some(save) => SolveControl::resumed(
            solved,
            cfg.max_execution_time,
            Duration::from_millis(save.elapsed_ms),
        ),
        None => SolveControl::new(solved, cfg.max_execution_time),
    };
    let make_saver = || {
        cfg.autosave
            .as_ref()
            .map(|policy| Autosaver::new(policy, puzzle.name(), worker_id))
    };

    let built = match &saved {
        Some(save) => Solver::resumed(
            puzzle.rows(),
            puzzle.cols(),
            puzzle.tiles(),
            edge_index,
            cfg,
            &control,
            record,
            worker_id,
            &pinned,
            save,
            make_saver(),
        ),
        None => Solver::new(
            puzzle.rows(),
            puzzle.cols(),
            puzzle.tiles(),
            edge_index,
            cfg,
            &control,
            record,
            worker_id,
            seed,
            &pinned,
            make_saver(),
        ),
    };
    let mut solver = match built {
        Ok(solver) => solver,
        Err(e) => {
            warn!(worker = worker_id, error = %e, "worker cannot start");
            done.fetch_add(1, Ordering::Release);
            return WorkerReport {
                worker: worker_id,
                stats: Stats::new(),
                found_solution: false,
            };
        }
    };

    debug!(
        worker = worker_id,
        seed,
        pinned = solver.fixed_len(),
        resumed = saved.is_some(),
        "worker starting"
    );
    let found_solution = solver.run();
    let stats = solver.stats().clone();
    shared.absorb(&stats);
    done.fetch_add(1, Ordering::Release);
    info!(
        worker = worker_id,
        solved = found_solution,
        canceled = !found_solution && control.is_solved(),
        timed_out = control.is_timed_out(),
        placements = stats.placements,
        backtracks = stats.backtracks,
        "worker finished"
    );
    WorkerReport {
        worker: worker_id,
        stats,
        found_solution,
    }
}

/// This worker's pinned placements: the puzzle's fixed pieces plus, for
/// the first four workers of a large enough instance, one distinct
/// corner tile pre-placed in that worker's corner.
fn pinned_plan(puzzle: &Puzzle, worker_id: usize) -> Vec<FixedPiece> {
    let tiles = puzzle.tiles();
    let mut plan: Vec<FixedPiece> = puzzle.fixed().to_vec();
    if tiles.len() - plan.len() <= DIVERSIFY_MIN_UNUSED || worker_id >= 4 {
        return plan;
    }

    let mut board = Board::new(puzzle.rows(), puzzle.cols(), tiles.max_id());
    for piece in &plan {
        if let Some(tile) = tiles.get(piece.tile)
            && board.place(piece.row, piece.col, tile, piece.rotation).is_err()
        {
            // A broken fixed-piece table is rejected later by the solver.
            return plan;
        }
    }

    let corners = [
        (0, 0),
        (0, puzzle.cols() - 1),
        (puzzle.rows() - 1, 0),
        (puzzle.rows() - 1, puzzle.cols() - 1),
    ];
    let (row, col) = corners[worker_id];
    if !board.is_empty(row, col) {
        return plan;
    }
    let corner_tiles: Vec<_> = tiles
        .iter()
        .filter(|t| t.kind() == TileKind::Corner && !board.is_used(t.id()))
        .collect();
    let Some(tile) = corner_tiles.get(worker_id) else {
        return plan;
    };
    for rotation in 0..tile.distinct_rotations() {
        if fits(&board, row, col, tile.edges_rotated(rotation as i32)) {
            debug!(
                worker = worker_id,
                tile = %tile.id(),
                row,
                col,
                "corner diversification"
            );
            plan.push(FixedPiece {
                row,
                col,
                tile: tile.id(),
                rotation,
            });
            return plan;
        }
    }
    plan
}

/// Cheap pre-validation of a loaded save: the history must replay cleanly
/// and start with this worker's pinned placements.
fn validate_save(
    puzzle: &Puzzle,
    pinned: &[FixedPiece],
    save: &SaveState,
    worker_id: usize,
) -> bool {
    if save.history.len() < pinned.len() {
        warn!(worker = worker_id, "save shorter than pinned prefix, starting fresh");
        return false;
    }
    for (saved, piece) in save.history.iter().zip(pinned) {
        if (saved.row as usize, saved.col as usize, saved.tile, saved.rotation & 3)
            != (piece.row, piece.col, piece.tile.get(), piece.rotation & 3)
        {
            warn!(worker = worker_id, "save prefix mismatch, starting fresh");
            return false;
        }
    }
    let mut scratch = Board::new(puzzle.rows(), puzzle.cols(), puzzle.tiles().max_id());
    match replay(&mut scratch, puzzle.tiles(), &save.history) {
        Ok(_) => true,
        Err(e) => {
            warn!(worker = worker_id, error = %e, "inconsistent save, starting fresh");
            false
        }
    }
}

/// Progress daemon: periodically logs the global best and backstops the
/// wall deadline by tripping the shared stop flag.
fn monitor(
    cfg: &SolverConfig,
    workers: usize,
    solved: Arc<AtomicBool>,
    record: &RecordTracker,
    done: &AtomicUsize,
) {
    let started = Instant::now();
    let backstop = cfg
        .max_execution_time
        .map(|limit| limit + Duration::from_millis(500));
    let mut last_log = Instant::now();
    loop {
        if done.load(Ordering::Acquire) >= workers {
            return;
        }
        if let Some(limit) = backstop
            && started.elapsed() >= limit
            && !solved.load(Ordering::Relaxed)
        {
            warn!("deadline passed, signaling workers to stop");
            solved.store(true, Ordering::Release);
        }
        if last_log.elapsed() >= Duration::from_secs(1) {
            last_log = Instant::now();
            debug!(
                best_depth = record.max_depth(),
                best_score = record.best_score(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search progress"
            );
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}
