//! # Actors Module
//!
//! The two kinds of turn occupants: the [`Player`], driven by external
//! input, and the autonomous [`Agent`]s that chase it. Both claim exactly
//! one grid tile at a time and share the same turn-occupant shape: a move
//! budget granted at turn start, step-by-step execution, and a derived
//! visibility flag under the forest rule.

pub mod agent;
pub mod player;

pub use agent::{Agent, AgentConfig, AgentId, TurnOutcome};
pub use player::Player;

use crate::grid::TileCoord;

/// The occupant-visibility adjacency test: same tile or a 4-directional
/// neighbor. Sums axis distances, so diagonals are excluded; this is
/// deliberately stricter than chessboard adjacency.
pub(crate) fn is_adjacent_or_same(a: TileCoord, b: TileCoord) -> bool {
    a.manhattan_distance(b) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_excludes_diagonals() {
        let center = TileCoord::new(5, 5);
        assert!(is_adjacent_or_same(center, center));
        assert!(is_adjacent_or_same(center, TileCoord::new(5, 6)));
        assert!(is_adjacent_or_same(center, TileCoord::new(4, 5)));
        assert!(!is_adjacent_or_same(center, TileCoord::new(6, 6)));
        assert!(!is_adjacent_or_same(center, TileCoord::new(5, 7)));
    }
}
