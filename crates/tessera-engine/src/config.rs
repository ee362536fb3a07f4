//! Solver configuration knobs.

use std::path::PathBuf;
use std::time::Duration;

/// Direction of the numeric-id fallback when the value orderer is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// When and where to write autosave checkpoints.
#[derive(Debug, Clone)]
pub struct AutosavePolicy {
    /// Directory for save files.
    pub dir: PathBuf,
    /// Save after this many backtracks since the last save…
    pub every_backtracks: u64,
    /// …or after this much wall time, whichever comes first.
    pub every: Duration,
}

impl AutosavePolicy {
    /// Save eagerly, after every backtrack. Used by tests.
    pub fn eager(dir: impl Into<PathBuf>) -> AutosavePolicy {
        AutosavePolicy {
            dir: dir.into(),
            every_backtracks: 1,
            every: Duration::ZERO,
        }
    }
}

/// All tunables recognized by the search core. Field defaults match the
/// behavior the heuristics were tuned with.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Gate the singleton detector.
    pub use_singletons: bool,
    /// Gate AC-3 propagation. A benchmark knob, not a correctness knob.
    pub use_ac3: bool,
    /// Gate the per-worker domain cache.
    pub use_domain_cache: bool,
    /// Gate the least-constraining-value orderer; off falls back to
    /// numeric tile-id order.
    pub use_lcv: bool,
    /// Prefer frame cells in the cell selector's tie-break.
    pub prioritize_borders: bool,
    /// Direction of the id-order fallback.
    pub sort_order: SortOrder,
    /// Gate informational logging only.
    pub verbose: bool,
    /// Records shallower than this are never announced.
    pub min_depth_to_show_records: usize,
    /// Per-worker wall-clock budget; `None` searches until solved or
    /// exhausted.
    pub max_execution_time: Option<Duration>,
    /// Worker fan-out (at least 1).
    pub thread_count: usize,
    /// Base entropy; per-worker seeds are derived from it.
    pub random_seed: u64,
    /// Autosave policy; `None` disables save/resume entirely.
    pub autosave: Option<AutosavePolicy>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            use_singletons: true,
            use_ac3: true,
            use_domain_cache: false,
            use_lcv: true,
            prioritize_borders: true,
            sort_order: SortOrder::Ascending,
            verbose: false,
            min_depth_to_show_records: 0,
            max_execution_time: None,
            thread_count: 1,
            random_seed: 0,
            autosave: None,
        }
    }
}

impl SolverConfig {
    /// Clamp nonsensical values instead of erroring.
    pub fn normalized(mut self) -> SolverConfig {
        self.thread_count = self.thread_count.max(1);
        self
    }
}
