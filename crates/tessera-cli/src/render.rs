//! Terminal board rendering: edge colors per cell, candidate counts for
//! empty cells, and an optional highlight on the next cell to fill.

use std::fmt::Write as _;

use tessera_core::{Board, Direction, TileSet};
use tessera_engine::{DomainStore, Stats};

/// ANSI 256-color codes cycled for interior edge colors. Chosen for
/// contrast on both dark and light terminals.
const PALETTE: [u8; 12] = [39, 208, 40, 199, 220, 135, 51, 202, 118, 171, 214, 87];

fn paint(value: u8, color: bool) -> String {
    let text = format!("{value:>2}");
    if !color {
        return text;
    }
    if value == 0 {
        // Frame edges render dim.
        return format!("\x1b[2m{text}\x1b[0m");
    }
    let code = PALETTE[(value as usize - 1) % PALETTE.len()];
    format!("\x1b[38;5;{code}m{text}\x1b[0m")
}

/// Render a board as text, three lines per cell row.
///
/// Filled cells show their four oriented edge colors and tile id; empty
/// cells show their candidate count when a domain store is supplied.
/// `highlight` marks the cell the selector would fill next.
pub fn render_board(
    board: &Board,
    domains: Option<&DomainStore>,
    highlight: Option<(usize, usize)>,
    color: bool,
) -> String {
    let mut out = String::new();
    let cols = board.cols();

    let mut rule = String::from("+");
    for _ in 0..cols {
        rule.push_str("--------+");
    }

    for row in 0..board.rows() {
        out.push_str(&rule);
        out.push('\n');
        // Three text lines per cell row: north edge, west/id/east, south.
        for text_line in 0..3 {
            out.push('|');
            for col in 0..cols {
                let marked = highlight == Some((row, col));
                let cell = match board.placement(row, col) {
                    Some(p) => match text_line {
                        0 => format!("   {}   ", paint(p.edge(Direction::North).value(), color)),
                        1 => format!(
                            "{}{:^4}{}",
                            paint(p.edge(Direction::West).value(), color),
                            p.tile().get(),
                            paint(p.edge(Direction::East).value(), color)
                        ),
                        _ => format!("   {}   ", paint(p.edge(Direction::South).value(), color)),
                    },
                    None => match text_line {
                        1 => {
                            let label = domains
                                .and_then(|d| d.domain(row, col))
                                .map(|d| format!("{:^8}", format!("({})", d.tile_count())))
                                .unwrap_or_else(|| format!("{:^8}", "."));
                            label
                        }
                        _ => " ".repeat(8),
                    },
                };
                if marked && text_line == 1 && color {
                    // Inverse video on the highlighted cell's middle line.
                    let _ = write!(out, "\x1b[7m{cell}\x1b[0m");
                } else {
                    out.push_str(&cell);
                }
                out.push('|');
            }
            out.push('\n');
        }
    }
    out.push_str(&rule);
    out.push('\n');

    let score = board.calculate_score();
    let _ = writeln!(
        out,
        "depth {}/{}  score {}/{}",
        board.placed_count(),
        board.cell_count(),
        score.matched,
        score.max
    );
    out
}

/// Render the board with candidate counts computed fresh from its state.
pub fn render_with_candidates(board: &Board, tiles: &TileSet, color: bool) -> String {
    let mut stats = Stats::new();
    let mut domains = DomainStore::new(board.rows(), board.cols());
    domains.initialize(board, tiles, &mut stats);
    render_board(board, Some(&domains), None, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Color, Tile, TileId, TileSet};

    fn tile(id: u16, edges: [u8; 4]) -> Tile {
        Tile::new(TileId::new(id), edges.map(Color::new))
    }

    fn sample() -> (Board, TileSet) {
        let tiles = TileSet::new(vec![
            tile(1, [0, 1, 1, 0]),
            tile(2, [0, 0, 1, 1]),
            tile(3, [1, 1, 0, 0]),
            tile(4, [1, 0, 0, 1]),
        ])
        .unwrap();
        let mut board = Board::new(2, 2, 4);
        board.place(0, 0, tiles.get(TileId::new(1)).unwrap(), 0).unwrap();
        (board, tiles)
    }

    #[test]
    fn plain_render_has_no_escape_codes() {
        let (board, tiles) = sample();
        let text = render_with_candidates(&board, &tiles, false);
        assert!(!text.contains('\x1b'));
        assert!(text.contains("depth 1/4"));
        // The placed tile id appears in the middle line.
        assert!(text.contains(" 1 "));
    }

    #[test]
    fn colored_render_is_gated_by_flag() {
        let (board, tiles) = sample();
        let colored = render_with_candidates(&board, &tiles, true);
        assert!(colored.contains("\x1b[38;5;"));
    }

    #[test]
    fn empty_cells_show_candidate_counts() {
        let (board, tiles) = sample();
        let text = render_with_candidates(&board, &tiles, false);
        // Each empty cell has some candidates; at least one "(n)" marker.
        assert!(text.contains('('));
    }

    #[test]
    fn line_count_matches_board_shape() {
        let (board, tiles) = sample();
        let text = render_with_candidates(&board, &tiles, false);
        // 2 cell rows * (1 rule + 3 lines) + final rule + score line.
        assert_eq!(text.lines().count(), 2 * 4 + 2);
    }
}
