//! Core model for edge-matching puzzles: colors, tiles, boards, and fit rules.

mod board;
mod color;
mod direction;
mod edge_index;
mod error;
mod fits;
mod placement;
mod puzzle;
mod tile;
mod used;
mod zobrist;

pub use board::{Board, Score};
pub use color::Color;
pub use direction::Direction;
pub use edge_index::EdgeIndex;
pub use error::{BoardError, PuzzleError};
pub use fits::fits;
pub use placement::Placement;
pub use puzzle::{FixedPiece, Puzzle, PuzzleFamily};
pub use tile::{Tile, TileId, TileKind, TileSet};
pub use used::UsedTiles;
