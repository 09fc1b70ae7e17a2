//! # Game Events
//!
//! The engine's outward signal surface. Presentation collaborators
//! (animation, audio, UI, level transitions) consume these; the core never
//! draws or plays anything itself.

use crate::actors::AgentId;
use crate::grid::TileCoord;
use serde::{Deserialize, Serialize};

/// A signal emitted by the engine, buffered until the embedder drains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player's turn opened; input may be re-enabled.
    PlayerTurnStarted,
    /// The player's move budget was rolled for this turn.
    MovesRolled { moves: u32 },
    /// The player stepped to a new tile.
    PlayerMoved { from: TileCoord, to: TileCoord },
    /// The player's derived visibility flag changed.
    PlayerVisibilityChanged { visible: bool },
    /// The player picked up the pickaxe.
    PickaxeCollected { tile: TileCoord },
    /// A rock tile was broken into walkable floor.
    RockBroken { tile: TileCoord },
    /// An agent stepped to a new tile.
    AgentMoved {
        agent: AgentId,
        from: TileCoord,
        to: TileCoord,
    },
    /// An agent's derived visibility flag changed.
    AgentVisibilityChanged { agent: AgentId, visible: bool },
    /// An agent played its attack on the player's tile.
    AgentAttacked { agent: AgentId, tile: TileCoord },
    /// Terminal: an agent caught the player. The level restarts externally
    /// after the configured delay.
    PlayerCaught { agent: AgentId, tile: TileCoord },
    /// Terminal: the player reached the goal tile. The next level loads
    /// externally after the configured delay.
    LevelCompleted { tile: TileCoord },
}
