//! Puzzle-file loading.
//!
//! Grammar (UTF-8 text, `#` comments and blank lines ignored):
//!
//! ```text
//! rows cols [family]
//! id n e s w          # one line per tile
//! fixed row col id rotation
//! ```
//!
//! Tile lines must precede `fixed` lines. The optional family tag is
//! normalized to lowercase and consulted for a mandatory fixed-piece
//! count; a file with fewer `fixed` lines than the family mandates is
//! rejected. Everything structural (tile count, unique ids, fixed-piece
//! sanity) is validated by the core puzzle constructor.

use std::fs;
use std::path::Path;

use tessera_core::{Color, FixedPiece, Puzzle, PuzzleFamily, Tile, TileId, TileSet};

use crate::error::{CliError, ParseReason};

/// Load and validate a puzzle file. The puzzle name is the file stem.
pub fn load_puzzle(path: &Path) -> Result<Puzzle, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "puzzle".to_string());
    parse_puzzle(&name, &text)
}

/// Parse puzzle text. Exposed separately so tests can skip the filesystem.
pub fn parse_puzzle(name: &str, text: &str) -> Result<Puzzle, CliError> {
    let parse_error = |line: usize, reason: ParseReason| CliError::Parse {
        name: name.to_string(),
        line,
        reason,
    };

    let mut header: Option<(usize, usize, Option<String>)> = None;
    let mut tiles: Vec<Tile> = Vec::new();
    let mut fixed: Vec<FixedPiece> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();

        if header.is_none() {
            // First significant line: `rows cols [family]`.
            let (rows, cols) = match fields.as_slice() {
                [rows, cols] | [rows, cols, _] => (
                    rows.parse::<usize>()
                        .map_err(|_| parse_error(line_no, ParseReason::BadHeader))?,
                    cols.parse::<usize>()
                        .map_err(|_| parse_error(line_no, ParseReason::BadHeader))?,
                ),
                _ => return Err(parse_error(line_no, ParseReason::BadHeader)),
            };
            let family = fields.get(2).map(|tag| tag.to_ascii_lowercase());
            header = Some((rows, cols, family));
            continue;
        }

        if fields[0] == "fixed" {
            let [_, row, col, id, rotation] = fields.as_slice() else {
                return Err(parse_error(line_no, ParseReason::BadFixedRecord));
            };
            let piece = (|| {
                Some(FixedPiece {
                    row: row.parse().ok()?,
                    col: col.parse().ok()?,
                    tile: TileId::new(id.parse::<u16>().ok()?),
                    rotation: {
                        let rotation: u8 = rotation.parse().ok()?;
                        (rotation < 4).then_some(rotation)?
                    },
                })
            })()
            .ok_or_else(|| parse_error(line_no, ParseReason::BadFixedRecord))?;
            fixed.push(piece);
            continue;
        }

        if !fixed.is_empty() {
            return Err(parse_error(line_no, ParseReason::TileAfterFixed));
        }
        let [id, north, east, south, west] = fields.as_slice() else {
            return Err(parse_error(line_no, ParseReason::BadTileRecord));
        };
        let tile = (|| {
            let id: u16 = id.parse().ok()?;
            let edges = [north, east, south, west]
                .map(|field| field.parse::<u8>().ok().map(Color::new));
            let [n, e, s, w] = edges;
            Some(Tile::new(TileId::new(id), [n?, e?, s?, w?]))
        })()
        .ok_or_else(|| parse_error(line_no, ParseReason::BadTileRecord))?;
        tiles.push(tile);
    }

    let Some((rows, cols, family)) = header else {
        return Err(parse_error(text.lines().count().max(1), ParseReason::MissingHeader));
    };

    if let Some(tag) = &family {
        let required = PuzzleFamily::from_tag(tag)
            .map(PuzzleFamily::mandatory_fixed_count)
            .unwrap_or(0);
        if fixed.len() < required {
            return Err(CliError::MissingMandatoryFixed {
                family: tag.clone(),
                required,
                found: fixed.len(),
            });
        }
    }

    let tiles = TileSet::new(tiles)?;
    Ok(Puzzle::new(name, rows, cols, tiles, fixed)?)
}
