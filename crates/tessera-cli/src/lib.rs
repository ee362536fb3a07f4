//! Command-line frontend: load a puzzle file, run the solver pool, render
//! the best board and the final statistics.

pub mod args;
pub mod error;
pub mod loader;
pub mod render;
pub mod report;

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser as _;
use tracing::info;

pub use args::Args;
pub use error::CliError;

/// Parse the process arguments and run.
pub fn run() -> Result<ExitCode, CliError> {
    run_with(Args::parse())
}

/// Run with pre-parsed arguments. Exit code 0 on solved, 2 on a partial
/// result (timeout or exhaustion); usage errors propagate as `Err`.
pub fn run_with(args: Args) -> Result<ExitCode, CliError> {
    let puzzle = loader::load_puzzle(&args.puzzle)?;
    info!(
        puzzle = puzzle.name(),
        rows = puzzle.rows(),
        cols = puzzle.cols(),
        tiles = puzzle.tiles().len(),
        fixed = puzzle.fixed().len(),
        "puzzle loaded"
    );

    let cfg = args.solver_config();
    let outcome = tessera_engine::solve(&puzzle, &cfg);

    // Stdout carries only the board and the report; everything else goes
    // through tracing.
    let color = !args.no_color && std::io::stdout().is_terminal();
    match &outcome.best {
        Some(best) => {
            println!(
                "{}",
                render::render_with_candidates(&best.board, puzzle.tiles(), color)
            );
        }
        None => println!("no placements were made"),
    }
    print!("{}", report::format_report(&outcome, args.verbose));

    Ok(if outcome.solved {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}
