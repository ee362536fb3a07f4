//! Command-line arguments and their mapping onto the solver knobs.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use tessera_engine::{AutosavePolicy, SolverConfig, SortOrder};

/// Direction of the tile-id fallback ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrderArg {
    Ascending,
    Descending,
}

/// Edge-matching puzzle solver.
#[derive(Debug, Clone, Parser)]
#[command(name = "tessera", version, about = "Edge-matching puzzle solver")]
pub struct Args {
    /// Puzzle file to solve.
    pub puzzle: PathBuf,

    /// Number of parallel search workers.
    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    /// Per-worker wall-clock budget in milliseconds; unlimited if absent.
    #[arg(long)]
    pub max_time_ms: Option<u64>,

    /// Base entropy for per-worker seeds.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Disable the singleton (forced move) detector.
    #[arg(long, default_value_t = false)]
    pub no_singletons: bool,

    /// Disable AC-3 propagation.
    #[arg(long, default_value_t = false)]
    pub no_ac3: bool,

    /// Disable least-constraining-value ordering (fall back to id order).
    #[arg(long, default_value_t = false)]
    pub no_lcv: bool,

    /// Enable the per-worker domain cache.
    #[arg(long, default_value_t = false)]
    pub domain_cache: bool,

    /// Disable the border-first tie-break in cell selection.
    #[arg(long, default_value_t = false)]
    pub no_border_priority: bool,

    /// Tile-id ordering when LCV is disabled.
    #[arg(long, value_enum, default_value_t = SortOrderArg::Ascending)]
    pub sort_order: SortOrderArg,

    /// Log search records and per-worker progress.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Minimum depth before a record is announced.
    #[arg(long, default_value_t = 0)]
    pub min_depth_to_show: usize,

    /// Directory for save files; enables autosave and resume.
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Autosave after this many backtracks.
    #[arg(long, default_value_t = 10_000)]
    pub autosave_backtracks: u64,

    /// Autosave at least this often, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub autosave_ms: u64,

    /// Plain output without ANSI colors.
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

impl Args {
    /// Map the flags onto a solver configuration.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            use_singletons: !self.no_singletons,
            use_ac3: !self.no_ac3,
            use_domain_cache: self.domain_cache,
            use_lcv: !self.no_lcv,
            prioritize_borders: !self.no_border_priority,
            sort_order: match self.sort_order {
                SortOrderArg::Ascending => SortOrder::Ascending,
                SortOrderArg::Descending => SortOrder::Descending,
            },
            verbose: self.verbose,
            min_depth_to_show_records: self.min_depth_to_show,
            max_execution_time: self.max_time_ms.map(Duration::from_millis),
            thread_count: self.threads,
            random_seed: self.seed,
            autosave: self.save_dir.as_ref().map(|dir| AutosavePolicy {
                dir: dir.clone(),
                every_backtracks: self.autosave_backtracks,
                every: Duration::from_millis(self.autosave_ms),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_to_default_config() {
        let args = Args::parse_from(["tessera", "puzzle.txt"]);
        let cfg = args.solver_config();
        assert!(cfg.use_singletons);
        assert!(cfg.use_ac3);
        assert!(cfg.use_lcv);
        assert!(cfg.prioritize_borders);
        assert!(!cfg.use_domain_cache);
        assert_eq!(cfg.thread_count, 1);
        assert_eq!(cfg.max_execution_time, None);
        assert!(cfg.autosave.is_none());
    }

    #[test]
    fn negative_flags_invert_knobs() {
        let args = Args::parse_from([
            "tessera",
            "puzzle.txt",
            "--no-ac3",
            "--no-singletons",
            "--no-lcv",
            "--no-border-priority",
            "--domain-cache",
            "--threads",
            "8",
            "--max-time-ms",
            "2500",
            "--sort-order",
            "descending",
        ]);
        let cfg = args.solver_config();
        assert!(!cfg.use_ac3);
        assert!(!cfg.use_singletons);
        assert!(!cfg.use_lcv);
        assert!(!cfg.prioritize_borders);
        assert!(cfg.use_domain_cache);
        assert_eq!(cfg.thread_count, 8);
        assert_eq!(cfg.max_execution_time, Some(Duration::from_millis(2500)));
        assert_eq!(cfg.sort_order, SortOrder::Descending);
    }

    #[test]
    fn save_dir_enables_autosave() {
        let args = Args::parse_from([
            "tessera",
            "puzzle.txt",
            "--save-dir",
            "/tmp/saves",
            "--autosave-backtracks",
            "500",
        ]);
        let cfg = args.solver_config();
        let autosave = cfg.autosave.unwrap();
        assert_eq!(autosave.dir, PathBuf::from("/tmp/saves"));
        assert_eq!(autosave.every_backtracks, 500);
    }
}
