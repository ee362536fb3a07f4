//! Search statistics: per-worker counters and a relaxed shared aggregate.

use std::sync::atomic::{AtomicU64, Ordering};

/// How many shallow depths participate in progress estimation. Deeper
/// branching factors make the estimate meaningless.
pub const PROGRESS_DEPTHS: usize = 5;

/// Candidate bookkeeping for one shallow depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthProgress {
    /// Candidates registered at the first visit of this depth.
    pub total_options: u64,
    /// Candidates fully explored so far.
    pub explored: u64,
}

/// Monotone counters owned by one worker. Plain integers: cheap to bump
/// on the hot path, absorbed into [`SharedStats`] when the worker exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Entries into the recursive search.
    pub recursive_calls: u64,
    /// Fit-checker invocations.
    pub fit_checks: u64,
    /// Successful placements (includes forced ones).
    pub placements: u64,
    /// Placements undone after a failed subtree.
    pub backtracks: u64,
    /// Dead ends reported by propagation or the singleton scan.
    pub dead_ends: u64,
    /// Forced moves found by the singleton detector.
    pub singletons_found: u64,
    /// Candidates rejected by fit check or trapped-gap veto.
    pub forward_check_rejects: u64,
    progress: [DepthProgress; PROGRESS_DEPTHS],
}

impl Stats {
    /// Fresh zeroed counters.
    pub fn new() -> Stats {
        Stats::default()
    }

    /// Record, once per depth, how many candidates the first visit of
    /// `depth` has to try. Later visits of the same depth are ignored.
    pub fn register_options(&mut self, depth: usize, total: u64) {
        if depth < PROGRESS_DEPTHS && self.progress[depth].total_options == 0 {
            self.progress[depth].total_options = total;
        }
    }

    /// Record that one candidate at `depth` was fully explored.
    pub fn option_explored(&mut self, depth: usize) {
        if depth < PROGRESS_DEPTHS {
            self.progress[depth].explored += 1;
        }
    }

    /// Progress bookkeeping for one shallow depth.
    pub fn progress_at(&self, depth: usize) -> Option<DepthProgress> {
        self.progress.get(depth).copied()
    }

    /// Estimated fraction of the search space explored, from the shallow
    /// depths only. `None` until depth 0 registers its options.
    pub fn progress_estimate(&self) -> Option<f64> {
        if self.progress[0].total_options == 0 {
            return None;
        }
        // Each depth refines the estimate within one top-level option.
        let mut fraction = 0.0;
        let mut weight = 1.0;
        for p in &self.progress {
            if p.total_options == 0 {
                break;
            }
            weight /= p.total_options as f64;
            fraction += p.explored.min(p.total_options) as f64 * weight;
        }
        Some(fraction.min(1.0))
    }
}

/// Aggregate counters shared across workers. Relaxed ordering throughout:
/// these are informational, never synchronization.
#[derive(Debug, Default)]
pub struct SharedStats {
    pub recursive_calls: AtomicU64,
    pub fit_checks: AtomicU64,
    pub placements: AtomicU64,
    pub backtracks: AtomicU64,
    pub dead_ends: AtomicU64,
    pub singletons_found: AtomicU64,
    pub forward_check_rejects: AtomicU64,
}

impl SharedStats {
    /// Fresh zeroed aggregate.
    pub fn new() -> SharedStats {
        SharedStats::default()
    }

    /// Fold one worker's counters into the aggregate.
    pub fn absorb(&self, stats: &Stats) {
        self.recursive_calls
            .fetch_add(stats.recursive_calls, Ordering::Relaxed);
        self.fit_checks.fetch_add(stats.fit_checks, Ordering::Relaxed);
        self.placements.fetch_add(stats.placements, Ordering::Relaxed);
        self.backtracks.fetch_add(stats.backtracks, Ordering::Relaxed);
        self.dead_ends.fetch_add(stats.dead_ends, Ordering::Relaxed);
        self.singletons_found
            .fetch_add(stats.singletons_found, Ordering::Relaxed);
        self.forward_check_rejects
            .fetch_add(stats.forward_check_rejects, Ordering::Relaxed);
    }

    /// Snapshot the aggregate into a plain [`Stats`] (progress fields zero).
    pub fn snapshot(&self) -> Stats {
        Stats {
            recursive_calls: self.recursive_calls.load(Ordering::Relaxed),
            fit_checks: self.fit_checks.load(Ordering::Relaxed),
            placements: self.placements.load(Ordering::Relaxed),
            backtracks: self.backtracks.load(Ordering::Relaxed),
            dead_ends: self.dead_ends.load(Ordering::Relaxed),
            singletons_found: self.singletons_found.load(Ordering::Relaxed),
            forward_check_rejects: self.forward_check_rejects.load(Ordering::Relaxed),
            ..Stats::default()
        }
    }
}
