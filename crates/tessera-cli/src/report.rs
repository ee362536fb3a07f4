//! End-of-run statistics report.

use std::fmt::Write as _;

use tessera_engine::{SolveOutcome, Stats};

fn counter_rows(stats: &Stats) -> [(&'static str, u64); 7] {
    [
        ("recursive calls", stats.recursive_calls),
        ("fit checks", stats.fit_checks),
        ("placements", stats.placements),
        ("backtracks", stats.backtracks),
        ("dead ends", stats.dead_ends),
        ("singletons", stats.singletons_found),
        ("forward-check rejects", stats.forward_check_rejects),
    ]
}

/// Format the final report: outcome line, aggregated counters, optional
/// per-worker breakdown, and the shallow-depth progress estimate.
pub fn format_report(outcome: &SolveOutcome, verbose: bool) -> String {
    let mut out = String::new();

    let verdict = if outcome.solved {
        "solved"
    } else if outcome
        .per_worker
        .iter()
        .all(|w| w.stats.recursive_calls == 0)
    {
        "not started"
    } else {
        "no solution found"
    };
    let _ = writeln!(
        out,
        "{verdict} in {:.3}s  (best depth {}, best score {})",
        outcome.elapsed.as_secs_f64(),
        outcome.best_depth,
        outcome.best_score,
    );

    let _ = writeln!(out, "totals:");
    for (label, value) in counter_rows(&outcome.totals) {
        let _ = writeln!(out, "  {label:<22} {value:>12}");
    }

    if verbose {
        for report in &outcome.per_worker {
            let _ = writeln!(
                out,
                "worker {}{}:",
                report.worker,
                if report.found_solution { " (winner)" } else { "" }
            );
            for (label, value) in counter_rows(&report.stats) {
                let _ = writeln!(out, "  {label:<22} {value:>12}");
            }
            if let Some(progress) = report.stats.progress_estimate() {
                let _ = writeln!(out, "  {:<22} {:>11.1}%", "progress explored", progress * 100.0);
            }
        }
    }
    out
}
