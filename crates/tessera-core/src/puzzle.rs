//! Puzzle definition: dimensions, tile set, fixed pieces, family registry.

use crate::error::PuzzleError;
use crate::tile::{TileId, TileSet};

/// A mandatory placement pinned before the search starts and never
/// backtracked past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPiece {
    pub row: usize,
    pub col: usize,
    pub tile: TileId,
    pub rotation: u8,
}

/// Known puzzle families with mandatory hint counts.
///
/// A flat enumeration instead of string-keyed lookup; tags are normalized
/// to lowercase at the boundary and unknown tags carry no mandate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleFamily {
    /// The 16×16 Eternity-II puzzle: one center hint plus eight clue hints.
    Eternity2,
}

impl PuzzleFamily {
    /// Resolve a family tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<PuzzleFamily> {
        match tag.to_ascii_lowercase().as_str() {
            "eternity2" => Some(PuzzleFamily::Eternity2),
            _ => None,
        }
    }

    /// How many fixed pieces this family mandates.
    pub fn mandatory_fixed_count(self) -> usize {
        match self {
            PuzzleFamily::Eternity2 => 9,
        }
    }
}

/// A validated puzzle instance: an R×C board, exactly R·C tiles, and an
/// ordered list of fixed pieces.
#[derive(Debug, Clone)]
pub struct Puzzle {
    name: String,
    rows: usize,
    cols: usize,
    tiles: TileSet,
    fixed: Vec<FixedPiece>,
}

impl Puzzle {
    /// Validate and build a puzzle.
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        tiles: TileSet,
        fixed: Vec<FixedPiece>,
    ) -> Result<Puzzle, PuzzleError> {
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::EmptyBoard);
        }
        if tiles.len() != rows * cols {
            return Err(PuzzleError::TileCountMismatch {
                expected: rows * cols,
                found: tiles.len(),
            });
        }
        let mut seen_cells = vec![false; rows * cols];
        let mut seen_tiles: Vec<TileId> = Vec::with_capacity(fixed.len());
        for piece in &fixed {
            if piece.row >= rows || piece.col >= cols {
                return Err(PuzzleError::FixedOutOfBounds {
                    row: piece.row,
                    col: piece.col,
                });
            }
            if piece.rotation >= 4 {
                return Err(PuzzleError::FixedBadRotation {
                    rotation: piece.rotation,
                });
            }
            if tiles.get(piece.tile).is_none() {
                return Err(PuzzleError::FixedUnknownTile { tile: piece.tile });
            }
            let cell = piece.row * cols + piece.col;
            if seen_cells[cell] {
                return Err(PuzzleError::FixedDuplicateCell {
                    row: piece.row,
                    col: piece.col,
                });
            }
            seen_cells[cell] = true;
            if seen_tiles.contains(&piece.tile) {
                return Err(PuzzleError::FixedDuplicateTile { tile: piece.tile });
            }
            seen_tiles.push(piece.tile);
        }
        Ok(Puzzle {
            name: name.into(),
            rows,
            cols,
            tiles,
            fixed,
        })
    }

    /// Puzzle name (used for save-file naming).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The shared tile set.
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// The mandatory placements, in pin order.
    pub fn fixed(&self) -> &[FixedPiece] {
        &self.fixed
    }
}
