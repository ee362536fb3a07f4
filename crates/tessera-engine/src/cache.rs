//! Bounded per-worker domain cache keyed by board hash.
//!
//! A fixed power-of-two table indexed by the low hash bits with
//! replace-always eviction. A probe verifies the full hash, the cell, and
//! the placed-tile count before trusting a slot; backtracking needs no
//! purge because it restores the previous board hash, leaving
//! post-placement entries unreachable.

use crate::domain::CellDomain;

#[derive(Debug)]
struct CacheSlot {
    hash: u64,
    cell: u32,
    placed: u32,
    domain: CellDomain,
}

/// Per-worker, bounded, evictable cache of computed cell domains.
pub struct DomainCache {
    slots: Vec<Option<CacheSlot>>,
    mask: usize,
    hits: u64,
    misses: u64,
}

impl DomainCache {
    /// Default slot count, a few MB per worker on typical boards.
    pub const DEFAULT_SLOTS: usize = 1 << 14;

    /// Cache with `slots` entries, rounded up to a power of two.
    pub fn new(slots: usize) -> DomainCache {
        let slots = slots.next_power_of_two().max(2);
        DomainCache {
            slots: (0..slots).map(|_| None).collect(),
            mask: slots - 1,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up the domain computed for `cell` at board state `hash`.
    pub fn probe(&mut self, hash: u64, cell: usize, placed: usize) -> Option<CellDomain> {
        let slot = self.slots[(hash as usize) & self.mask].as_ref()?;
        if slot.hash == hash && slot.cell == cell as u32 && slot.placed == placed as u32 {
            self.hits += 1;
            Some(slot.domain.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    /// Record the domain computed for `cell` at board state `hash`.
    pub fn store(&mut self, hash: u64, cell: usize, placed: usize, domain: CellDomain) {
        self.slots[(hash as usize) & self.mask] = Some(CacheSlot {
            hash,
            cell: cell as u32,
            placed: placed as u32,
            domain,
        });
    }

    /// (hits, misses) since construction.
    pub fn hit_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

impl std::fmt::Debug for DomainCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainCache")
            .field("slots", &self.slots.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
