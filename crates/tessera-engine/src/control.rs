//! Cooperative stop control: shared solved flag and per-worker deadline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Decides when a worker's search must unwind.
///
/// Checked at the entry of every recursive call. Two conditions stop a
/// worker: another worker set the shared solved flag, or this worker's
/// wall-clock budget ran out. Both propagate as plain `false` returns
/// through every frame, never as panics or errors.
///
/// The clock is only read every 1024 calls; the flag is read every time.
#[derive(Debug)]
pub struct SolveControl {
    solved: Arc<AtomicBool>,
    start: Instant,
    /// Wall time consumed by previous runs of a resumed search.
    base_elapsed: Duration,
    deadline: Option<Duration>,
    timed_out: AtomicBool,
}

impl SolveControl {
    /// Control with an optional per-worker budget, clock running from now.
    pub fn new(solved: Arc<AtomicBool>, deadline: Option<Duration>) -> SolveControl {
        SolveControl {
            solved,
            start: Instant::now(),
            base_elapsed: Duration::ZERO,
            deadline,
            timed_out: AtomicBool::new(false),
        }
    }

    /// Control resuming a saved search that had already consumed
    /// `base_elapsed` of its budget.
    pub fn resumed(
        solved: Arc<AtomicBool>,
        deadline: Option<Duration>,
        base_elapsed: Duration,
    ) -> SolveControl {
        SolveControl {
            solved,
            start: Instant::now(),
            base_elapsed,
            deadline,
            timed_out: AtomicBool::new(false),
        }
    }

    /// Whether the search must unwind now.
    ///
    /// `calls` is the worker's recursive-call count, used to throttle
    /// clock reads; the solved flag is checked unconditionally. Once the
    /// deadline fires the result latches, so later throttled calls stop
    /// immediately.
    pub fn should_stop(&self, calls: u64) -> bool {
        if self.solved.load(Ordering::Acquire) {
            return true;
        }
        if self.timed_out.load(Ordering::Relaxed) {
            return true;
        }
        if calls & 1023 != 0 {
            return false;
        }
        if let Some(deadline) = self.deadline
            && self.elapsed() >= deadline
        {
            self.timed_out.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Mark the puzzle solved, releasing every worker.
    pub fn mark_solved(&self) {
        self.solved.store(true, Ordering::Release);
    }

    /// Whether some worker has solved the puzzle.
    pub fn is_solved(&self) -> bool {
        self.solved.load(Ordering::Acquire)
    }

    /// Whether this worker's own deadline fired.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Relaxed)
    }

    /// Cumulative elapsed time, including previous runs when resumed.
    pub fn elapsed(&self) -> Duration {
        self.base_elapsed + self.start.elapsed()
    }

    /// The shared solved flag.
    pub fn solved_flag(&self) -> &Arc<AtomicBool> {
        &self.solved
    }
}
