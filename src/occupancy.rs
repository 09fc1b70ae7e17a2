//! # Occupancy Module
//!
//! The shared registry of tiles currently claimed by some occupant.
//!
//! The set is owned by the engine and lent to whichever occupant is taking
//! its turn, never ambient global state. Mutual exclusion over tile claims
//! is enforced by discipline rather than by the coordinate type: an occupant
//! releases its own tile before planning a turn and re-claims its final tile
//! after moving, so no two occupants ever hold the same tile at the moment
//! another occupant's planner reads the set.

use crate::grid::TileCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Set of tiles currently claimed by some occupant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OccupancySet {
    tiles: HashSet<TileCoord>,
}

impl OccupancySet {
    /// Creates an empty occupancy set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every claim. Called at level start before occupants register.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Claims `tile`. Returns false if it was already claimed.
    pub fn claim(&mut self, tile: TileCoord) -> bool {
        self.tiles.insert(tile)
    }

    /// Releases `tile`. Returns false if it was not claimed.
    pub fn release(&mut self, tile: TileCoord) -> bool {
        self.tiles.remove(&tile)
    }

    /// Returns whether `tile` is currently claimed.
    pub fn is_claimed(&self, tile: TileCoord) -> bool {
        self.tiles.contains(&tile)
    }

    /// Number of claimed tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns whether no tiles are claimed.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Claimed tiles in unspecified order, for snapshots and diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> {
        self.tiles.iter()
    }
}
