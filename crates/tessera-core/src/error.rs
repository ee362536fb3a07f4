//! Error types for board mutation and puzzle validation.

use crate::tile::TileId;

/// Errors from illegal board mutations.
///
/// These indicate caller bugs: the search only places after a fit check
/// and never reuses tiles. Debug builds panic at the call site instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// Target cell is outside the board.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Target cell already holds a placement.
    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    /// The tile is already placed elsewhere.
    #[error("tile {tile} is already placed")]
    TileInUse { tile: TileId },
}

/// Errors from puzzle construction and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    /// Board has zero rows or columns.
    #[error("board must have at least one row and one column")]
    EmptyBoard,

    /// Tile count does not equal rows × cols.
    #[error("expected {expected} tiles for the board, found {found}")]
    TileCountMismatch { expected: usize, found: usize },

    /// A tile id of zero was supplied.
    #[error("tile ids must be positive")]
    ZeroTileId,

    /// The same tile id was supplied twice.
    #[error("duplicate tile id {id}")]
    DuplicateTileId { id: TileId },

    /// A fixed piece targets a cell outside the board.
    #[error("fixed piece at ({row}, {col}) is outside the board")]
    FixedOutOfBounds { row: usize, col: usize },

    /// A fixed piece carries a rotation outside 0..4.
    #[error("fixed piece rotation {rotation} is not in 0..4")]
    FixedBadRotation { rotation: u8 },

    /// A fixed piece references a tile that is not in the set.
    #[error("fixed piece references unknown tile {tile}")]
    FixedUnknownTile { tile: TileId },

    /// Two fixed pieces target the same cell.
    #[error("two fixed pieces target cell ({row}, {col})")]
    FixedDuplicateCell { row: usize, col: usize },

    /// Two fixed pieces use the same tile.
    #[error("tile {tile} is fixed twice")]
    FixedDuplicateTile { tile: TileId },
}
