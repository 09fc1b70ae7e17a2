//! # Player
//!
//! The externally-driven occupant. Input handling, dice UI, and animation
//! live outside the core; what remains here is the player's tile, its move
//! budget for the current turn, the one-way pickaxe flag, and the derived
//! visibility flag under the forest rule.

use crate::actors::is_adjacent_or_same;
use crate::engine::GameEvent;
use crate::grid::{Grid, TileCoord};
use log::debug;
use serde::{Deserialize, Serialize};

/// The player occupant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    current_tile: TileCoord,
    moves_remaining: u32,
    has_pickaxe: bool,
    frozen: bool,
    visible: bool,
}

impl Player {
    /// Creates a player standing on `tile` with an empty move budget.
    pub fn new(tile: TileCoord) -> Self {
        Self {
            current_tile: tile,
            moves_remaining: 0,
            has_pickaxe: false,
            frozen: false,
            visible: true,
        }
    }

    /// The tile the player currently claims.
    pub fn current_tile(&self) -> TileCoord {
        self.current_tile
    }

    /// Moves left in the current turn.
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// Whether the pickaxe has been collected.
    pub fn has_pickaxe(&self) -> bool {
        self.has_pickaxe
    }

    /// Whether the player has been frozen by a terminal event.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Derived visibility flag under the forest rule.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Places the player directly on `tile` (level setup and restarts).
    pub fn set_tile(&mut self, tile: TileCoord) {
        self.current_tile = tile;
    }

    /// Sets the move budget for this turn.
    pub fn set_moves(&mut self, moves: u32) {
        self.moves_remaining = moves;
    }

    /// Consumes one move. Saturates at zero.
    pub fn spend_move(&mut self) {
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
    }

    /// Collects the pickaxe. One-way: once true, rocks can be broken and
    /// walked for the remainder of the level.
    pub fn collect_pickaxe(&mut self) {
        self.has_pickaxe = true;
        debug!("player collected the pickaxe");
    }

    /// Permanently halts the player (defeat or victory pose).
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Recomputes the player's derived visibility flag.
    ///
    /// In forest the player is visible only when some agent stands on the
    /// same or a 4-directionally adjacent tile; elsewhere it is always
    /// visible. Emits [`GameEvent::PlayerVisibilityChanged`] on transitions.
    pub fn update_visibility(
        &mut self,
        grid: &Grid,
        agent_tiles: &[TileCoord],
        events: &mut Vec<GameEvent>,
    ) {
        let previous = self.visible;

        self.visible = if grid.is_forest(self.current_tile) {
            agent_tiles
                .iter()
                .any(|&tile| is_adjacent_or_same(tile, self.current_tile))
        } else {
            true
        };

        if self.visible != previous {
            debug!(
                "player at {} became {}",
                self.current_tile,
                if self.visible { "visible" } else { "invisible" }
            );
            events.push(GameEvent::PlayerVisibilityChanged {
                visible: self.visible,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileFlags;

    fn forest_grid() -> Grid {
        let mut grid = Grid::new(16.0);
        for y in 0..10 {
            for x in 0..10 {
                grid.set_tile(TileCoord::new(x, y), TileFlags::floor());
            }
        }
        grid.set_tile(TileCoord::new(5, 5), TileFlags::forest());
        grid
    }

    #[test]
    fn test_pickaxe_is_one_way() {
        let mut player = Player::new(TileCoord::new(0, 0));
        assert!(!player.has_pickaxe());
        player.collect_pickaxe();
        assert!(player.has_pickaxe());
    }

    #[test]
    fn test_spend_move_saturates() {
        let mut player = Player::new(TileCoord::new(0, 0));
        player.set_moves(1);
        player.spend_move();
        player.spend_move();
        assert_eq!(player.moves_remaining(), 0);
    }

    #[test]
    fn test_forest_visibility_against_agents() {
        let grid = forest_grid();
        let mut player = Player::new(TileCoord::new(5, 5));
        let mut events = Vec::new();

        // Agent two tiles away: hidden
        player.update_visibility(&grid, &[TileCoord::new(5, 7)], &mut events);
        assert!(!player.is_visible());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerVisibilityChanged { visible: false })));

        // Cardinal neighbor: seen
        player.update_visibility(&grid, &[TileCoord::new(5, 6)], &mut events);
        assert!(player.is_visible());

        // Diagonal neighbor only: hidden again
        player.update_visibility(&grid, &[TileCoord::new(6, 6)], &mut events);
        assert!(!player.is_visible());
    }

    #[test]
    fn test_open_ground_is_always_visible() {
        let grid = forest_grid();
        let mut player = Player::new(TileCoord::new(0, 0));
        let mut events = Vec::new();

        player.update_visibility(&grid, &[], &mut events);
        assert!(player.is_visible());
        assert!(events.is_empty());
    }
}
