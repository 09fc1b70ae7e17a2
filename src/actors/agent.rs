//! # Agent
//!
//! The autonomous chaser. Each agent runs its own per-turn state machine:
//! plan a path (chase the player if visible, fall back to the last
//! remembered player tile, otherwise wander), then execute it one tile at a
//! time against the shared occupancy set, interrupting itself the moment it
//! lands on the player.
//!
//! Turn completion is guaranteed on every exit path, including faults, so
//! the scheduler can never be left waiting on a stalled agent.

use crate::actors::is_adjacent_or_same;
use crate::engine::{GameEvent, Pacing};
use crate::grid::{Direction, Grid, TileCoord};
use crate::occupancy::OccupancySet;
use crate::{config, BrambleResult};
use log::{debug, error};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an agent, used for event attribution.
pub type AgentId = Uuid;

/// Creates a new unique agent ID.
pub fn new_agent_id() -> AgentId {
    Uuid::new_v4()
}

/// Per-agent-type configuration, supplied by the embedding game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Minimum move budget drawn at turn start
    pub min_moves: u32,
    /// Maximum move budget drawn at turn start
    pub max_moves: u32,
    /// Whether the agent wanders when it has no target
    pub wander_when_no_target: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            min_moves: config::DEFAULT_AGENT_MIN_MOVES,
            max_moves: config::DEFAULT_AGENT_MAX_MOVES,
            wander_when_no_target: true,
        }
    }
}

/// How an agent's turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The turn ran to completion (possibly doing nothing).
    Completed,
    /// The agent stepped onto the player's tile; terminal defeat.
    CaughtPlayer,
}

/// An autonomous occupant chasing the player.
///
/// Agents never carry the pickaxe, so every walkability query they make uses
/// base walkability. A frozen agent stays frozen for the rest of the level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    config: AgentConfig,
    current_tile: TileCoord,
    moves_remaining: u32,
    planned_moves: u32,
    last_known_player_tile: Option<TileCoord>,
    is_moving: bool,
    visible: bool,
    initialized: bool,
    turn_completed: bool,
    frozen: bool,
}

impl Agent {
    /// Creates an agent that has not been placed on the grid yet.
    ///
    /// An unplaced agent skips every turn; call [`Agent::place`] during
    /// level setup.
    pub fn new(config: AgentConfig) -> Self {
        Self {
            id: new_agent_id(),
            config,
            current_tile: TileCoord::new(0, 0),
            moves_remaining: 0,
            planned_moves: 0,
            last_known_player_tile: None,
            is_moving: false,
            visible: true,
            initialized: false,
            turn_completed: true,
            frozen: false,
        }
    }

    /// Places the agent on its starting tile and marks it initialized.
    pub fn place(&mut self, tile: TileCoord) {
        self.current_tile = tile;
        self.initialized = true;
        debug!("agent {}: initialized at {}", self.id, tile);
    }

    /// The agent's unique ID.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The tile the agent currently claims.
    pub fn current_tile(&self) -> TileCoord {
        self.current_tile
    }

    /// Moves left in the current turn.
    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    /// The budget drawn at the start of the current turn.
    pub fn planned_moves(&self) -> u32 {
        self.planned_moves
    }

    /// True while a step transition is logically in flight.
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// True when the agent has nothing left to do this turn.
    pub fn turn_completed(&self) -> bool {
        self.turn_completed
    }

    /// Whether the agent has been placed on the grid.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Derived visibility flag under the forest rule.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the agent has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The remembered player tile, if the agent still has a stale target.
    pub fn last_known_player_tile(&self) -> Option<TileCoord> {
        self.last_known_player_tile
    }

    /// Permanently halts the agent for the remainder of the level.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Draws the move budget for the agent's next turn.
    ///
    /// Only runs when the previous turn has completed; calling it again
    /// before the turn executes changes nothing, so a stalled agent is never
    /// granted moves twice. A no-op while unplaced or while the agent set is
    /// frozen.
    pub fn set_steps_for_next_turn(&mut self, rng: &mut StdRng, set_frozen: bool) {
        if !self.initialized || set_frozen {
            return;
        }

        if self.turn_completed {
            self.planned_moves = rng.gen_range(self.config.min_moves..=self.config.max_moves);
            self.moves_remaining = self.planned_moves;
            self.turn_completed = false;
            debug!(
                "agent {}: set steps for next turn: {}",
                self.id, self.moves_remaining
            );
        } else {
            debug!(
                "agent {}: skipping budget grant, previous turn not completed",
                self.id
            );
        }
    }

    /// Executes the agent's turn against the shared occupancy set.
    ///
    /// Skipped entirely (and immediately marked completed) when the agent is
    /// unplaced, has no budget, is already mid-turn, or is frozen either
    /// individually or at the set level. The completion flag is set on every
    /// exit path; a fault during execution is logged and degrades to an
    /// empty turn.
    #[allow(clippy::too_many_arguments)]
    pub async fn take_turn(
        &mut self,
        grid: &Grid,
        occupancy: &mut OccupancySet,
        player_tile: TileCoord,
        set_frozen: bool,
        pacing: &Pacing,
        rng: &mut StdRng,
        events: &mut Vec<GameEvent>,
    ) -> TurnOutcome {
        if !self.initialized
            || self.moves_remaining == 0
            || self.is_moving
            || self.frozen
            || set_frozen
        {
            self.turn_completed = true;
            debug!(
                "agent {}: skipping turn - unplaced, no moves, mid-turn, or frozen",
                self.id
            );
            return TurnOutcome::Completed;
        }

        self.is_moving = true;

        let outcome = match self
            .run_turn(grid, occupancy, player_tile, pacing, rng, events)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("agent {}: turn execution failed: {}", self.id, e);
                TurnOutcome::Completed
            }
        };

        // The scheduler awaits this turn to completion; the flags must flip
        // on every exit path, success, abort, or fault.
        self.is_moving = false;
        self.turn_completed = true;
        debug!(
            "agent {}: turn completed with {} moves remaining",
            self.id, self.moves_remaining
        );

        outcome
    }

    async fn run_turn(
        &mut self,
        grid: &Grid,
        occupancy: &mut OccupancySet,
        player_tile: TileCoord,
        pacing: &Pacing,
        rng: &mut StdRng,
        events: &mut Vec<GameEvent>,
    ) -> BrambleResult<TurnOutcome> {
        occupancy.release(self.current_tile);

        let mut path: Vec<TileCoord> = Vec::new();
        let can_see_player = self.can_see_player(grid, player_tile);
        debug!(
            "agent {} at {} can see player: {}",
            self.id, self.current_tile, can_see_player
        );

        if can_see_player {
            self.last_known_player_tile = Some(player_tile);
            path = grid.find_path(self.current_tile, player_tile);
            debug!(
                "agent {}: chasing player along path with {} steps",
                self.id,
                path.len()
            );
        } else if let Some(remembered) = self.last_known_player_tile {
            if remembered != self.current_tile {
                path = grid.find_path(self.current_tile, remembered);
                debug!(
                    "agent {}: moving to last known player tile {}",
                    self.id, remembered
                );

                if path.is_empty() || path[0] == remembered {
                    debug!(
                        "agent {}: reached last known player tile, losing target",
                        self.id
                    );
                    self.last_known_player_tile = None;
                    path.clear();
                }
            }
        }

        if (path.is_empty() || self.last_known_player_tile.is_none())
            && self.config.wander_when_no_target
        {
            path = self.wander_path(grid, occupancy, player_tile, self.moves_remaining, rng);
            debug!(
                "agent {}: wandering along path with {} steps",
                self.id,
                path.len()
            );
        }

        let steps_to_move = path.len().min(self.moves_remaining as usize);

        for &next_tile in path.iter().take(steps_to_move) {
            // The plan may have gone stale since it was made; abort the rest
            // of it rather than forcing the step.
            if !grid.is_walkable(next_tile, false)
                || (occupancy.is_claimed(next_tile) && next_tile != player_tile)
            {
                break;
            }

            pacing.step_transition().await;

            let from = self.current_tile;
            self.current_tile = next_tile;
            self.moves_remaining -= 1;
            events.push(GameEvent::AgentMoved {
                agent: self.id,
                from,
                to: next_tile,
            });

            self.update_visibility(grid, player_tile, events);

            if grid.can_see(self.current_tile, player_tile) {
                self.last_known_player_tile = Some(player_tile);
            }

            if self.current_tile == player_tile {
                debug!("agent {}: caught the player at {}", self.id, player_tile);
                events.push(GameEvent::AgentAttacked {
                    agent: self.id,
                    tile: player_tile,
                });
                return Ok(TurnOutcome::CaughtPlayer);
            }

            pacing.between_steps().await;
        }

        occupancy.claim(self.current_tile);
        Ok(TurnOutcome::Completed)
    }

    /// Whether this agent can currently perceive the player.
    ///
    /// The player is visible unless standing in forest; a forest player is
    /// still seen from the same tile or a 4-directional neighbor.
    pub fn can_see_player(&self, grid: &Grid, player_tile: TileCoord) -> bool {
        !grid.is_forest(player_tile) || is_adjacent_or_same(self.current_tile, player_tile)
    }

    /// Recomputes the agent's derived visibility flag.
    ///
    /// In forest the agent is visible only when the player is on the same or
    /// a 4-directionally adjacent tile; elsewhere it is always visible.
    /// Emits [`GameEvent::AgentVisibilityChanged`] on transitions.
    pub fn update_visibility(
        &mut self,
        grid: &Grid,
        player_tile: TileCoord,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.initialized {
            debug!("agent {}: visibility update before placement", self.id);
            return;
        }

        let previous = self.visible;

        self.visible = if grid.is_forest(self.current_tile) {
            is_adjacent_or_same(self.current_tile, player_tile)
        } else {
            true
        };

        if self.visible != previous {
            debug!(
                "agent {} at {} became {}",
                self.id,
                self.current_tile,
                if self.visible { "visible" } else { "invisible" }
            );
            events.push(GameEvent::AgentVisibilityChanged {
                agent: self.id,
                visible: self.visible,
            });
        }
    }

    /// Greedily builds a wander path of up to `steps` tiles.
    ///
    /// Each step tries the four directions in shuffled order and takes the
    /// first walkable, unclaimed neighbor, stopping early when none works.
    /// The player's claimed tile does not block wandering; stepping onto it
    /// is the catch condition.
    fn wander_path(
        &self,
        grid: &Grid,
        occupancy: &OccupancySet,
        player_tile: TileCoord,
        steps: u32,
        rng: &mut StdRng,
    ) -> Vec<TileCoord> {
        let mut path = Vec::new();
        let mut current = self.current_tile;

        for _ in 0..steps {
            let mut directions = Direction::ALL;
            directions.shuffle(rng);

            let mut found_move = false;
            for dir in directions {
                let next = current + dir.delta();
                if grid.is_walkable(next, false)
                    && !(occupancy.is_claimed(next) && next != player_tile)
                {
                    path.push(next);
                    current = next;
                    found_move = true;
                    break;
                }
            }

            if !found_move {
                break;
            }
        }

        path
    }
}
