//! Engine error types. Save-path errors are logged and swallowed on the
//! search path; replay inconsistencies trigger a fresh-start fallback.

use tessera_core::TileId;

/// Errors from writing or reading save files.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Filesystem failure while writing or renaming.
    #[error("save I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The save body could not be encoded or decoded.
    #[error("save encoding error: {source}")]
    Codec {
        #[from]
        source: bincode::Error,
    },

    /// The file's history cannot be replayed onto a fresh board.
    #[error("inconsistent save file: {reason}")]
    Inconsistent {
        #[from]
        reason: ReplayError,
    },
}

/// Why a saved placement history failed to replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// History references a tile the puzzle does not contain.
    #[error("history references unknown tile {tile}")]
    UnknownTile { tile: TileId },

    /// The same tile appears twice in the history.
    #[error("tile {tile} appears twice in history")]
    DuplicateTile { tile: TileId },

    /// A recorded placement does not fit where the history says.
    #[error("tile {tile} does not fit at ({row}, {col})")]
    Unfittable {
        row: usize,
        col: usize,
        tile: TileId,
    },

    /// A recorded placement targets a cell outside the board.
    #[error("history targets cell ({row}, {col}) outside the board")]
    OutOfBounds { row: usize, col: usize },

    /// Two recorded placements target the same cell.
    #[error("history fills cell ({row}, {col}) twice")]
    CellOccupied { row: usize, col: usize },

    /// The replayed prefix disagrees with this worker's pinned placements.
    #[error("history prefix does not match the fixed placements")]
    FixedPrefixMismatch,
}
