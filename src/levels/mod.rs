//! # Levels Module
//!
//! ASCII level maps: the content source for the grid, the start/end
//! markers, agent spawns, and pickaxe pickups.
//!
//! Legend, one glyph per tile:
//!
//! | glyph | meaning                                         |
//! |-------|-------------------------------------------------|
//! | `.`   | walkable floor                                  |
//! | `#`   | rock (impassable without the pickaxe)           |
//! | `f`   | forest floor (hides occupants)                  |
//! | `-`   | existing floor flagged non-walkable             |
//! | `S`   | player start (floor underneath)                 |
//! | `E`   | goal tile (floor underneath)                    |
//! | `a`   | agent spawn (floor underneath)                  |
//! | `p`   | pickaxe pickup (floor underneath)               |
//! | space | void: no tile exists at this coordinate         |

use crate::grid::{Grid, TileCoord, TileFlags};
use crate::{config, BrambleError, BrambleResult};
use serde::{Deserialize, Serialize};

/// A parsed level: the grid plus everything the engine places on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelMap {
    /// The tile grid
    pub grid: Grid,
    /// Player start marker, if the map has one
    pub start: Option<TileCoord>,
    /// Goal marker, if the map has one
    pub end: Option<TileCoord>,
    /// Agent spawn tiles, in map reading order (top-to-bottom, left-to-right)
    pub agent_spawns: Vec<TileCoord>,
    /// Pickaxe pickup tiles
    pub pickaxe_tiles: Vec<TileCoord>,
}

impl LevelMap {
    /// Parses an ASCII map into a level.
    ///
    /// Rows map to `y`, columns to `x`, both starting at 0. Unknown glyphs
    /// and duplicate `S`/`E` markers are rejected.
    pub fn parse(text: &str, tile_size: f32) -> BrambleResult<LevelMap> {
        let mut grid = Grid::new(tile_size);
        let mut start = None;
        let mut end = None;
        let mut agent_spawns = Vec::new();
        let mut pickaxe_tiles = Vec::new();

        for (y, line) in text.lines().enumerate() {
            for (x, glyph) in line.chars().enumerate() {
                let coord = TileCoord::new(x as i32, y as i32);
                let flags = match glyph {
                    ' ' => continue,
                    '.' => TileFlags::floor(),
                    '#' => TileFlags::rock(),
                    'f' => TileFlags::forest(),
                    '-' => TileFlags {
                        walkable: false,
                        rock: false,
                        forest: false,
                    },
                    'S' => {
                        if start.replace(coord).is_some() {
                            return Err(BrambleError::MapParse(format!(
                                "duplicate start marker at {}",
                                coord
                            )));
                        }
                        TileFlags::floor()
                    }
                    'E' => {
                        if end.replace(coord).is_some() {
                            return Err(BrambleError::MapParse(format!(
                                "duplicate end marker at {}",
                                coord
                            )));
                        }
                        TileFlags::floor()
                    }
                    'a' => {
                        agent_spawns.push(coord);
                        TileFlags::floor()
                    }
                    'p' => {
                        pickaxe_tiles.push(coord);
                        TileFlags::floor()
                    }
                    other => {
                        return Err(BrambleError::MapParse(format!(
                            "unknown glyph '{}' at {}",
                            other, coord
                        )));
                    }
                };
                grid.set_tile(coord, flags);
            }
        }

        Ok(LevelMap {
            grid,
            start,
            end,
            agent_spawns,
            pickaxe_tiles,
        })
    }

    /// A small built-in level exercising every tile kind.
    pub fn demo() -> LevelMap {
        const DEMO: &str = "\
S..ff...\n\
.##f..a.\n\
.p...#.E\n\
..a.ff..";

        LevelMap::parse(DEMO, config::DEFAULT_TILE_SIZE)
            .expect("built-in demo map must parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_map_parses() {
        let level = LevelMap::demo();
        assert_eq!(level.start, Some(TileCoord::new(0, 0)));
        assert_eq!(level.end, Some(TileCoord::new(7, 2)));
        assert_eq!(level.agent_spawns.len(), 2);
        assert_eq!(level.pickaxe_tiles, vec![TileCoord::new(1, 2)]);
        assert!(level.grid.is_rock(TileCoord::new(1, 1)));
        assert!(level.grid.is_forest(TileCoord::new(3, 0)));
    }

    #[test]
    fn test_void_leaves_no_tile() {
        let level = LevelMap::parse("S E\n...", 16.0).unwrap();
        assert!(!level.grid.exists(TileCoord::new(1, 0)));
        assert!(level.grid.exists(TileCoord::new(1, 1)));
    }

    #[test]
    fn test_unknown_glyph_is_rejected() {
        let result = LevelMap::parse("S?E", 16.0);
        assert!(matches!(result, Err(BrambleError::MapParse(_))));
    }

    #[test]
    fn test_duplicate_markers_are_rejected() {
        assert!(matches!(
            LevelMap::parse("S.S", 16.0),
            Err(BrambleError::MapParse(_))
        ));
        assert!(matches!(
            LevelMap::parse("E.E", 16.0),
            Err(BrambleError::MapParse(_))
        ));
    }

    #[test]
    fn test_markers_sit_on_floor() {
        let level = LevelMap::parse("SEap", 16.0).unwrap();
        for x in 0..4 {
            assert!(level.grid.is_walkable(TileCoord::new(x, 0), false));
        }
    }
}
