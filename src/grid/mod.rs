//! # Grid Module
//!
//! Tile metadata and the queries everything else is built on: walkability
//! (conditioned on the pickaxe), rock and forest flags, the forest
//! line-of-sight rule, BFS pathfinding, and world/map coordinate conversion.
//!
//! The grid knows nothing about occupants. A coordinate absent from the tile
//! table is treated as non-existent: not walkable and false for every flag
//! query, so out-of-bounds is just another boolean outcome rather than an
//! error.

pub mod pathfinding;

use crate::config;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A tile coordinate: integer (column, row) pair.
///
/// # Examples
///
/// ```
/// use bramble::TileCoord;
///
/// let tile = TileCoord::new(3, 4);
/// assert_eq!(tile.manhattan_distance(TileCoord::new(0, 0)), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another coordinate.
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

impl std::ops::Add for TileCoord {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal movement directions.
///
/// The engine is strictly 4-directional: player input, agent steps, and BFS
/// expansion all move along these deltas. [`Direction::ALL`] is the BFS
/// neighbor enumeration order; path shapes depend on it, so it is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Neighbor enumeration order used by the pathfinder.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Converts a direction to a coordinate delta.
    ///
    /// `Up` decreases `y`, matching screen-space tile maps.
    pub fn delta(self) -> TileCoord {
        match self {
            Direction::Up => TileCoord::new(0, -1),
            Direction::Down => TileCoord::new(0, 1),
            Direction::Left => TileCoord::new(-1, 0),
            Direction::Right => TileCoord::new(1, 0),
        }
    }
}

/// Per-tile metadata flags, read-only at runtime except for rock breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileFlags {
    /// Whether the tile is marked walkable in the level source
    pub walkable: bool,
    /// Whether the tile is a rock (impassable without the pickaxe)
    pub rock: bool,
    /// Whether the tile is forest (hides occupants from distant observers)
    pub forest: bool,
}

impl TileFlags {
    /// Plain walkable floor.
    pub fn floor() -> Self {
        Self {
            walkable: true,
            rock: false,
            forest: false,
        }
    }

    /// A rock tile: exists, but only passable with the pickaxe.
    pub fn rock() -> Self {
        Self {
            walkable: false,
            rock: true,
            forest: false,
        }
    }

    /// Walkable forest floor.
    pub fn forest() -> Self {
        Self {
            walkable: true,
            rock: false,
            forest: true,
        }
    }
}

/// The tile grid: single source of truth for tile semantics, pathfinding,
/// and coordinate conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    tiles: HashMap<TileCoord, TileFlags>,
    tile_size: f32,
}

impl Grid {
    /// Creates an empty grid with the given tile edge length in world units.
    pub fn new(tile_size: f32) -> Self {
        Self {
            tiles: HashMap::new(),
            tile_size,
        }
    }

    /// Inserts or replaces the tile at `coord`.
    pub fn set_tile(&mut self, coord: TileCoord, flags: TileFlags) {
        self.tiles.insert(coord, flags);
    }

    /// Returns whether a tile exists at `coord`.
    pub fn exists(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Edge length of one tile in world units.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Returns whether the tile at `coord` is a rock. False for non-existent
    /// tiles.
    pub fn is_rock(&self, coord: TileCoord) -> bool {
        self.tiles.get(&coord).map(|t| t.rock).unwrap_or(false)
    }

    /// Returns whether the tile at `coord` is forest. False for non-existent
    /// tiles.
    pub fn is_forest(&self, coord: TileCoord) -> bool {
        self.tiles.get(&coord).map(|t| t.forest).unwrap_or(false)
    }

    /// Returns whether `coord` can be stepped onto.
    ///
    /// A tile is walkable only if it exists. A rock tile is walkable only
    /// when `has_pickaxe` is true. Any other existing tile is reported
    /// walkable even when its `walkable` flag is false; that case is
    /// surfaced with a warning but deliberately not rejected, because level
    /// content relies on the permissive behavior.
    pub fn is_walkable(&self, coord: TileCoord, has_pickaxe: bool) -> bool {
        let flags = match self.tiles.get(&coord) {
            Some(flags) => flags,
            None => {
                debug!("is_walkable: no tile at {}", coord);
                return false;
            }
        };

        if flags.rock && !has_pickaxe {
            debug!("tile at {} is a rock and not walkable without a pickaxe", coord);
            return false;
        }

        if !flags.walkable && !flags.rock {
            warn!("tile at {} is flagged non-walkable but treated as walkable", coord);
        }

        true
    }

    /// Determines whether `observer` can see `target` under the forest rule.
    ///
    /// The same tile is always visible. A forest target is visible only from
    /// a 4-directionally adjacent tile (Manhattan distance exactly 1,
    /// diagonals excluded). Anything else is always visible.
    pub fn can_see(&self, observer: TileCoord, target: TileCoord) -> bool {
        if observer == target {
            return true;
        }

        let is_adjacent = observer.manhattan_distance(target) == 1;

        if self.is_forest(target) {
            return is_adjacent;
        }

        true
    }

    /// Converts a rock tile into plain walkable floor.
    ///
    /// One-way: broken rocks never revert. Returns true if a rock was
    /// actually broken.
    pub fn break_rock(&mut self, coord: TileCoord) -> bool {
        match self.tiles.get_mut(&coord) {
            Some(flags) if flags.rock => {
                *flags = TileFlags::floor();
                debug!("broke rock at {}", coord);
                true
            }
            _ => false,
        }
    }

    /// Converts a continuous world position to the tile containing it.
    pub fn world_to_map(&self, world: (f32, f32)) -> TileCoord {
        TileCoord::new(
            (world.0 / self.tile_size).floor() as i32,
            (world.1 / self.tile_size).floor() as i32,
        )
    }

    /// Converts a tile coordinate to the world position of its center.
    ///
    /// Round-trips through [`Grid::world_to_map`] for every tile.
    pub fn map_to_world(&self, coord: TileCoord) -> (f32, f32) {
        (
            (coord.x as f32 + 0.5) * self.tile_size,
            (coord.y as f32 + 0.5) * self.tile_size,
        )
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(config::DEFAULT_TILE_SIZE)
    }
}
