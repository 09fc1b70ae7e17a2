//! # Bramble
//!
//! A turn-based grid chase engine: a player and a set of autonomous agents
//! occupy mutually-exclusive cells on a discrete grid, alternate turns, and
//! play out pathfinding, fog-of-war, and collision rules until the player
//! reaches the goal tile or an agent catches them.
//!
//! ## Architecture Overview
//!
//! The engine is split along the seams a presentation layer would plug into:
//!
//! - **Grid**: tile metadata, walkability/forest/rock queries, line-of-sight
//!   rules, BFS pathfinding, and world/map coordinate conversion
//! - **Occupancy Set**: an injected registry of currently-claimed tiles that
//!   keeps independently-scheduled occupants off each other's cells
//! - **Actors**: the player and the agents, each a small per-turn state
//!   machine over a dice-drawn move budget
//! - **Engine**: the single authority that serializes player and agent turns,
//!   awaits each agent turn to completion, and resolves win/lose conditions
//! - **Levels**: ASCII level maps supplying tiles, spawns, and markers
//!
//! Rendering, animation, audio, and scene transitions are external
//! collaborators: the engine emits [`GameEvent`]s for them and consumes
//! pacing delays and move-budget configuration from them.

pub mod actors;
pub mod engine;
pub mod grid;
pub mod levels;
pub mod occupancy;

pub use actors::{Agent, AgentConfig, AgentId, Player, TurnOutcome};
pub use engine::{DiceRange, Engine, GameEvent, Pacing, Phase, Snapshot};
pub use grid::{Direction, Grid, TileCoord, TileFlags};
pub use levels::LevelMap;
pub use occupancy::OccupancySet;

/// Core error type for the Bramble engine.
#[derive(thiserror::Error, Debug)]
pub enum BrambleError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A required collaborator was absent at initialization
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// Engine or occupant state is invalid for the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A level map could not be parsed
    #[error("Map parse error: {0}")]
    MapParse(String),
}

/// Result type used throughout the Bramble codebase.
pub type BrambleResult<T> = Result<T, BrambleError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default edge length of one tile in world units
    pub const DEFAULT_TILE_SIZE: f32 = 16.0;

    /// Default minimum agent move budget per turn
    pub const DEFAULT_AGENT_MIN_MOVES: u32 = 1;

    /// Default maximum agent move budget per turn
    pub const DEFAULT_AGENT_MAX_MOVES: u32 = 3;

    /// Default lower bound of the player's dice roll
    pub const DEFAULT_DICE_MIN: u32 = 1;

    /// Default upper bound of the player's dice roll
    pub const DEFAULT_DICE_MAX: u32 = 6;

    /// Default duration of a single step transition in milliseconds
    pub const DEFAULT_STEP_MS: u64 = 400;

    /// Default pause between consecutive agent steps in milliseconds
    pub const DEFAULT_INTER_STEP_MS: u64 = 100;

    /// Default delay before a terminal event hands off in milliseconds
    pub const DEFAULT_TERMINAL_MS: u64 = 1000;
}
