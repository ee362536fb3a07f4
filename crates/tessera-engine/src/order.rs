//! Candidate ordering for a chosen cell: least-constraining-value first.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tessera_core::{Board, EdgeIndex, TileId, TileSet};

use crate::analyze::neighbor_freedom;
use crate::config::{SolverConfig, SortOrder};
use crate::domain::DomainStore;
use crate::stats::Stats;

/// One oriented candidate for a cell, annotated with its lookahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub tile: TileId,
    pub rotation: u8,
    /// Options left to the neighbors if this candidate is placed;
    /// `None` means some neighbor is strangled and the candidate is
    /// pre-vetoed.
    pub freedom: Option<u64>,
}

/// Produce the ordered candidate list for `(row, col)` from its domain.
///
/// With the value orderer on, candidates leaving neighbors the most
/// options come first; ties fall to the harder tile (committing
/// hard-to-match tiles early fails fast). The sort is stable over a
/// seeded shuffle, so equal-key candidates arrive in a per-worker order
/// that diversifies otherwise-identical searches while staying
/// reproducible for a fixed seed. With the orderer off, candidates come
/// in numeric tile-id order, ascending or descending as configured.
///
/// Candidates never repeat an oriented placement: domains only hold a
/// tile's distinct rotations.
#[allow(clippy::too_many_arguments)]
pub fn order_candidates(
    board: &Board,
    tiles: &TileSet,
    edge_index: &EdgeIndex,
    domains: &DomainStore,
    row: usize,
    col: usize,
    cfg: &SolverConfig,
    rng: &mut StdRng,
    stats: &mut Stats,
) -> Vec<Candidate> {
    let Some(domain) = domains.domain(row, col) else {
        return Vec::new();
    };

    let lookahead_domains = cfg.use_ac3.then_some(domains);
    let mut candidates: Vec<Candidate> = Vec::with_capacity(domain.placement_count());
    for entry in domain.entries() {
        let Some(tile) = tiles.get(entry.tile) else {
            continue;
        };
        for &rotation in &entry.rotations {
            let freedom = neighbor_freedom(
                board,
                tiles,
                lookahead_domains,
                row,
                col,
                entry.tile,
                tile.edges_rotated(rotation as i32),
                stats,
            );
            candidates.push(Candidate {
                tile: entry.tile,
                rotation,
                freedom,
            });
        }
    }

    if cfg.use_lcv {
        candidates.shuffle(rng);
        candidates.sort_by(|a, b| {
            // Most neighbor freedom first; vetoed candidates sink.
            let freedom = b.freedom.unwrap_or(0).cmp(&a.freedom.unwrap_or(0));
            freedom.then_with(|| {
                edge_index
                    .difficulty(b.tile)
                    .total_cmp(&edge_index.difficulty(a.tile))
            })
        });
    } else {
        match cfg.sort_order {
            SortOrder::Ascending => {
                candidates.sort_by_key(|c| (c.tile, c.rotation));
            }
            SortOrder::Descending => {
                candidates.sort_by_key(|c| (std::cmp::Reverse(c.tile), c.rotation));
            }
        }
    }
    candidates
}
