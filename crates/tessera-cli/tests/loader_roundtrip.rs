//! File-level loader tests and an end-to-end run through the frontend.

use std::fs;

use clap::Parser as _;
use tessera_cli::args::Args;
use tessera_cli::loader::{load_puzzle, parse_puzzle};
use tessera_cli::run_with;
use tessera_core::TileId;

const PERFECT_2X2: &str = "\
# perfect 2x2
2 2
1 0 1 1 0
2 0 0 1 1
3 1 1 0 0
4 1 0 0 1
";

#[test]
fn file_and_text_loading_agree() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.tiles");
    fs::write(&path, PERFECT_2X2).unwrap();

    let from_file = load_puzzle(&path).unwrap();
    let from_text = parse_puzzle("mini", PERFECT_2X2).unwrap();

    assert_eq!(from_file.name(), "mini");
    assert_eq!(from_file.rows(), from_text.rows());
    assert_eq!(from_file.cols(), from_text.cols());
    assert_eq!(from_file.tiles().len(), from_text.tiles().len());
    for id in 1..=4u16 {
        assert_eq!(
            from_file.tiles().get(TileId::new(id)).unwrap().base_edges(),
            from_text.tiles().get(TileId::new(id)).unwrap().base_edges(),
        );
    }
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_puzzle(&dir.path().join("nope.tiles")).unwrap_err();
    assert!(matches!(err, tessera_cli::CliError::Io { .. }));
}

#[test]
fn end_to_end_solve_through_the_frontend() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.tiles");
    fs::write(&path, PERFECT_2X2).unwrap();

    let args = Args::parse_from([
        "tessera",
        path.to_str().unwrap(),
        "--no-color",
        "--threads",
        "2",
    ]);
    assert!(run_with(args).is_ok());
}

#[test]
fn end_to_end_with_save_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.tiles");
    fs::write(&path, PERFECT_2X2).unwrap();
    let saves = dir.path().join("saves");

    let args = Args::parse_from([
        "tessera",
        path.to_str().unwrap(),
        "--no-color",
        "--save-dir",
        saves.to_str().unwrap(),
        "--autosave-backtracks",
        "1",
        "--autosave-ms",
        "0",
    ]);
    assert!(run_with(args).is_ok());

    // A second run resumes from whatever was saved without erroring.
    let args = Args::parse_from([
        "tessera",
        path.to_str().unwrap(),
        "--no-color",
        "--save-dir",
        saves.to_str().unwrap(),
    ]);
    assert!(run_with(args).is_ok());
}
