//! Global best-record tracking shared by all workers.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tessera_core::{Board, Score};

/// A deep copy of the board that set a record, with its vitals.
#[derive(Debug, Clone)]
pub struct BestSnapshot {
    pub board: Board,
    pub depth: usize,
    pub score: Score,
    pub worker: usize,
}

/// What an [`RecordTracker::offer`] call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub depth_record: bool,
    pub score_record: bool,
}

/// Atomic, monotone "deepest depth / highest partial score" across
/// workers, with the winning board snapshot.
///
/// Depth and score only grow, raised by CAS loops; the snapshot install
/// is the one composite operation and takes a brief mutex. Readers see
/// either the previous coherent snapshot or the new one, never a torn
/// record.
#[derive(Debug)]
pub struct RecordTracker {
    max_depth: AtomicUsize,
    best_score: AtomicUsize,
    best_worker: AtomicUsize,
    snapshot: Mutex<Option<BestSnapshot>>,
    total_cells: usize,
    min_depth_to_show: usize,
}

impl RecordTracker {
    /// Tracker for a board of `total_cells` cells.
    pub fn new(total_cells: usize, min_depth_to_show: usize) -> RecordTracker {
        RecordTracker {
            max_depth: AtomicUsize::new(0),
            best_score: AtomicUsize::new(0),
            best_worker: AtomicUsize::new(0),
            snapshot: Mutex::new(None),
            total_cells,
            min_depth_to_show,
        }
    }

    /// Offer the current board as a record candidate.
    ///
    /// Raises `max_depth` and `best_score` independently (strictly
    /// greater only); if either was raised by this call, installs a deep
    /// copy of the board under the record mutex and credits `worker`.
    pub fn offer(&self, worker: usize, board: &Board) -> RecordOutcome {
        let depth = board.placed_count();
        let score = board.calculate_score();
        let depth_record = raise(&self.max_depth, depth);
        let score_record = raise(&self.best_score, score.matched);
        if depth_record || score_record {
            let mut guard = self.snapshot.lock().expect("record mutex poisoned");
            // Another worker may have slipped a better snapshot in
            // between the CAS and the lock; never replace it with less.
            let supersedes = guard
                .as_ref()
                .is_none_or(|s| depth > s.depth || score.matched > s.score.matched);
            if supersedes {
                *guard = Some(BestSnapshot {
                    board: board.clone(),
                    depth,
                    score,
                    worker,
                });
                self.best_worker.store(worker, Ordering::Release);
            }
        }
        RecordOutcome {
            depth_record,
            score_record,
        }
    }

    /// Deepest depth any worker has reached.
    pub fn max_depth(&self) -> usize {
        self.max_depth.load(Ordering::Acquire)
    }

    /// Best partial score any worker has reached.
    pub fn best_score(&self) -> usize {
        self.best_score.load(Ordering::Acquire)
    }

    /// Worker credited with the current snapshot.
    pub fn best_worker(&self) -> usize {
        self.best_worker.load(Ordering::Acquire)
    }

    /// Clone of the current best snapshot, if any record was ever set.
    pub fn snapshot(&self) -> Option<BestSnapshot> {
        self.snapshot
            .lock()
            .expect("record mutex poisoned")
            .clone()
    }

    /// Display gating, separate from the atomic update: a record is worth
    /// announcing only past the configured minimum depth, and depth
    /// records additionally only past 60% of the board.
    pub fn should_show(&self, depth: usize, depth_record: bool, score_record: bool) -> bool {
        if depth < self.min_depth_to_show {
            return false;
        }
        if depth_record && depth * 10 > self.total_cells * 6 {
            return true;
        }
        score_record
    }
}

/// CAS-raise `atomic` to `value`; `true` iff this call raised it.
fn raise(atomic: &AtomicUsize, value: usize) -> bool {
    let mut current = atomic.load(Ordering::Acquire);
    loop {
        if value <= current {
            return false;
        }
        match atomic.compare_exchange_weak(current, value, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return true,
            Err(observed) => current = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Color, Tile, TileId};

    fn board_with_depth(depth: usize) -> Board {
        let mut board = Board::new(2, 2, 4);
        let tiles = [
            Tile::new(TileId::new(1), [0, 1, 1, 0].map(Color::new)),
            Tile::new(TileId::new(2), [0, 0, 1, 1].map(Color::new)),
            Tile::new(TileId::new(4), [1, 0, 0, 1].map(Color::new)),
            Tile::new(TileId::new(3), [1, 1, 0, 0].map(Color::new)),
        ];
        let cells = [(0usize, 0usize, 0u8), (0, 1, 0), (1, 0, 1), (1, 1, 3)];
        for i in 0..depth.min(4) {
            let (r, c, rot) = cells[i];
            board.place(r, c, &tiles[i], rot).unwrap();
        }
        board
    }

    #[test]
    fn records_grow_monotonically() {
        let tracker = RecordTracker::new(4, 0);
        tracker.offer(0, &board_with_depth(2));
        assert_eq!(tracker.max_depth(), 2);
        // A shallower offer changes nothing.
        let outcome = tracker.offer(1, &board_with_depth(1));
        assert!(!outcome.depth_record);
        assert_eq!(tracker.max_depth(), 2);
        assert_eq!(tracker.snapshot().unwrap().depth, 2);

        let outcome = tracker.offer(1, &board_with_depth(3));
        assert!(outcome.depth_record);
        assert_eq!(tracker.max_depth(), 3);
        let snap = tracker.snapshot().unwrap();
        assert_eq!(snap.depth, 3);
        assert_eq!(snap.worker, 1);
    }

    #[test]
    fn snapshot_matches_offered_board() {
        let tracker = RecordTracker::new(4, 0);
        let board = board_with_depth(4);
        tracker.offer(2, &board);
        let snap = tracker.snapshot().unwrap();
        assert_eq!(snap.board, board);
        assert_eq!(snap.score, board.calculate_score());
        assert_eq!(tracker.best_score(), 4);
        assert_eq!(tracker.best_worker(), 2);
    }

    #[test]
    fn concurrent_offers_keep_true_maximum() {
        use std::sync::Arc;

        let tracker = Arc::new(RecordTracker::new(4, 0));
        std::thread::scope(|s| {
            for _ in 0..4 {
                let tracker = Arc::clone(&tracker);
                s.spawn(move || {
                    for depth in 0..=4 {
                        tracker.offer(depth, &board_with_depth(depth));
                    }
                });
            }
        });
        assert_eq!(tracker.max_depth(), 4);
        assert_eq!(tracker.best_score(), 4);
        let snap = tracker.snapshot().unwrap();
        assert_eq!(snap.depth, 4);
    }

    #[test]
    fn display_gating() {
        // 100-cell board, minimum display depth 10.
        let tracker = RecordTracker::new(100, 10);
        // Below the minimum: never shown.
        assert!(!tracker.should_show(5, true, true));
        // Depth record at 50% of the board: not yet.
        assert!(!tracker.should_show(50, true, false));
        // Depth record past 60%: shown.
        assert!(tracker.should_show(61, true, false));
        // Score records only need the minimum depth.
        assert!(tracker.should_show(12, false, true));
        // No record at all: nothing to show.
        assert!(!tracker.should_show(70, false, false));
    }
}
