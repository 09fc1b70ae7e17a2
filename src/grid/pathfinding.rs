//! # Pathfinding
//!
//! Breadth-first shortest paths over the walkable tiles of a [`Grid`].
//!
//! Multiple shortest paths usually exist on an open grid; which one comes
//! back is decided entirely by the neighbor enumeration order in
//! [`Direction::ALL`], so agent movement stays reproducible run to run.

use crate::grid::{Direction, Grid, TileCoord};
use log::debug;
use std::collections::{HashMap, HashSet, VecDeque};

impl Grid {
    /// Finds the shortest 4-directional path from `start` to `goal`.
    ///
    /// The returned sequence excludes `start` and includes `goal`. Planning
    /// always uses base walkability: rocks block pathing even when the
    /// caller holds the pickaxe. Returns an empty path when the goal is not
    /// walkable or unreachable (including `goal == start`).
    pub fn find_path(&self, start: TileCoord, goal: TileCoord) -> Vec<TileCoord> {
        if !self.is_walkable(goal, false) {
            debug!("find_path: goal tile {} is not walkable", goal);
            return Vec::new();
        }

        let mut visited = HashSet::new();
        visited.insert(start);
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut parent: HashMap<TileCoord, TileCoord> = HashMap::new();

        while let Some(u) = queue.pop_front() {
            if u == goal {
                break;
            }

            for dir in Direction::ALL {
                let v = u + dir.delta();
                if visited.contains(&v) || !self.is_walkable(v, false) {
                    continue;
                }

                visited.insert(v);
                parent.insert(v, u);
                queue.push_back(v);
            }
        }

        if !parent.contains_key(&goal) {
            debug!("find_path: no path from {} to {}", start, goal);
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cur = goal;
        while cur != start {
            path.push(cur);
            cur = parent[&cur];
        }
        path.reverse();

        debug!(
            "find_path: found path with {} steps from {} to {}",
            path.len(),
            start,
            goal
        );
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileFlags;

    fn open_grid(width: i32, height: i32) -> Grid {
        let mut grid = Grid::new(16.0);
        for y in 0..height {
            for x in 0..width {
                grid.set_tile(TileCoord::new(x, y), TileFlags::floor());
            }
        }
        grid
    }

    #[test]
    fn test_shortest_path_length_on_open_grid() {
        let grid = open_grid(3, 3);
        let path = grid.find_path(TileCoord::new(0, 0), TileCoord::new(2, 2));
        assert_eq!(path.len(), 4);
        assert_eq!(path.last(), Some(&TileCoord::new(2, 2)));
        assert!(!path.contains(&TileCoord::new(0, 0)));
    }

    #[test]
    fn test_expansion_order_fixes_path_shape() {
        // From (0, 0), Up and Left fall off the grid, so Down is expanded
        // before Right and the first hop is always downward.
        let grid = open_grid(2, 2);
        let path = grid.find_path(TileCoord::new(0, 0), TileCoord::new(1, 1));
        assert_eq!(path, vec![TileCoord::new(0, 1), TileCoord::new(1, 1)]);
    }

    #[test]
    fn test_unwalkable_goal_yields_empty_path() {
        let mut grid = open_grid(3, 3);
        grid.set_tile(TileCoord::new(2, 2), TileFlags::rock());

        assert!(grid
            .find_path(TileCoord::new(0, 0), TileCoord::new(2, 2))
            .is_empty());
        assert!(grid
            .find_path(TileCoord::new(0, 0), TileCoord::new(9, 9))
            .is_empty());
    }

    #[test]
    fn test_unreachable_goal_yields_empty_path() {
        // Wall of rocks splits the corridor
        let mut grid = open_grid(5, 1);
        grid.set_tile(TileCoord::new(2, 0), TileFlags::rock());

        assert!(grid
            .find_path(TileCoord::new(0, 0), TileCoord::new(4, 0))
            .is_empty());
    }

    #[test]
    fn test_goal_equal_to_start_yields_empty_path() {
        let grid = open_grid(3, 3);
        assert!(grid
            .find_path(TileCoord::new(1, 1), TileCoord::new(1, 1))
            .is_empty());
    }

    #[test]
    fn test_path_routes_around_rocks() {
        // . # .
        // . # .
        // . . .
        let mut grid = open_grid(3, 3);
        grid.set_tile(TileCoord::new(1, 0), TileFlags::rock());
        grid.set_tile(TileCoord::new(1, 1), TileFlags::rock());

        let path = grid.find_path(TileCoord::new(0, 0), TileCoord::new(2, 0));
        assert_eq!(path.len(), 6);
        assert!(path.contains(&TileCoord::new(1, 2)));
    }
}
