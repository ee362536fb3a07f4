//! Frontend errors: file access, puzzle-file grammar, validation.

use std::path::PathBuf;

use tessera_core::PuzzleError;

/// Why one line of a puzzle file failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseReason {
    /// The file ended before a `rows cols` header appeared.
    #[error("missing 'rows cols' header")]
    MissingHeader,

    /// The header line is not `rows cols [family]`.
    #[error("malformed header, expected 'rows cols [family]'")]
    BadHeader,

    /// A tile line is not `id n e s w` with values in range.
    #[error("malformed tile record, expected 'id n e s w'")]
    BadTileRecord,

    /// A fixed line is not `fixed row col id rotation` with values in range.
    #[error("malformed fixed record, expected 'fixed row col id rotation'")]
    BadFixedRecord,

    /// A tile record appeared after the first `fixed` line.
    #[error("tile records must precede fixed records")]
    TileAfterFixed,
}

/// Errors surfaced by the command-line frontend.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading the puzzle file failed.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of the puzzle file did not parse.
    #[error("{name}:{line}: {reason}")]
    Parse {
        name: String,
        line: usize,
        reason: ParseReason,
    },

    /// The parsed puzzle failed structural validation.
    #[error("invalid puzzle: {source}")]
    Puzzle {
        #[from]
        source: PuzzleError,
    },

    /// The declared family mandates more fixed pieces than were given.
    #[error("family '{family}' requires {required} fixed pieces, found {found}")]
    MissingMandatoryFixed {
        family: String,
        required: usize,
        found: usize,
    },
}
