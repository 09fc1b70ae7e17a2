//! # Engine Module
//!
//! The turn scheduler: the sole orchestrator of the level. It owns the grid,
//! the player, the ordered agent list, and the occupancy set; sequences
//! "player turn → all agent turns (serially) → visibility refresh → next
//! player turn"; and is the only place where win/lose conditions are
//! resolved.
//!
//! Agent turns execute strictly sequentially: the engine awaits each agent's
//! turn future to completion before starting the next, so occupancy
//! conflicts between agents are resolved deterministically by list order
//! rather than by race. Victory and defeat are terminal; once either phase
//! is entered no further turn cycling occurs and the external level manager
//! owns the restart or transition.

pub mod events;

pub use events::GameEvent;

use crate::actors::{Agent, AgentConfig, AgentId, Player, TurnOutcome};
use crate::grid::{Direction, Grid, TileCoord};
use crate::levels::LevelMap;
use crate::occupancy::OccupancySet;
use crate::{config, BrambleError, BrambleResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pacing delays handed to the core by the presentation layer, so that
/// animation and audio have time to play between simulation steps.
///
/// All delays are cooperative suspension points; [`Pacing::none`] makes the
/// simulation run as fast as the turn logic allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Duration of a single step transition in milliseconds
    pub step_ms: u64,
    /// Pause between consecutive agent steps in milliseconds
    pub inter_step_ms: u64,
    /// Delay before a terminal event hands off in milliseconds
    pub terminal_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            step_ms: config::DEFAULT_STEP_MS,
            inter_step_ms: config::DEFAULT_INTER_STEP_MS,
            terminal_ms: config::DEFAULT_TERMINAL_MS,
        }
    }
}

impl Pacing {
    /// Zero pacing for headless runs and tests.
    pub fn none() -> Self {
        Self {
            step_ms: 0,
            inter_step_ms: 0,
            terminal_ms: 0,
        }
    }

    pub(crate) async fn step_transition(&self) {
        Self::sleep(self.step_ms).await;
    }

    pub(crate) async fn between_steps(&self) {
        Self::sleep(self.inter_step_ms).await;
    }

    pub(crate) async fn terminal(&self) {
        Self::sleep(self.terminal_ms).await;
    }

    async fn sleep(ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

/// Inclusive range of the player's per-turn dice roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRange {
    pub min: u32,
    pub max: u32,
}

impl Default for DiceRange {
    fn default() -> Self {
        Self {
            min: config::DEFAULT_DICE_MIN,
            max: config::DEFAULT_DICE_MAX,
        }
    }
}

impl DiceRange {
    fn roll(&self, rng: &mut StdRng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

/// Which part of the turn cycle the engine is in.
///
/// `Victory` and `Defeat` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for player input
    PlayerTurn,
    /// Agent turns are executing serially
    AgentTurns,
    /// The player reached the goal tile
    Victory,
    /// An agent and the player collided
    Defeat,
}

/// The turn scheduler and single authority over the level.
#[derive(Debug)]
pub struct Engine {
    grid: Grid,
    player: Player,
    agents: Vec<Agent>,
    agent_spawns: Vec<TileCoord>,
    occupancy: OccupancySet,
    start_tile: TileCoord,
    end_tile: TileCoord,
    pickaxe_tiles: Vec<TileCoord>,
    phase: Phase,
    processing_turn: bool,
    agents_frozen: bool,
    pacing: Pacing,
    dice: DiceRange,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl Engine {
    /// Creates an engine for `level` with default agent, pacing, and dice
    /// configuration.
    pub fn new(level: LevelMap, seed: u64) -> BrambleResult<Self> {
        Self::with_config(
            level,
            AgentConfig::default(),
            Pacing::default(),
            DiceRange::default(),
            seed,
        )
    }

    /// Creates an engine with explicit configuration.
    ///
    /// Fails with [`BrambleError::MissingReference`] when the level lacks a
    /// start or end marker; the engine refuses to initialize rather than
    /// guessing.
    pub fn with_config(
        level: LevelMap,
        agent_config: AgentConfig,
        pacing: Pacing,
        dice: DiceRange,
        seed: u64,
    ) -> BrambleResult<Self> {
        let start_tile = level
            .start
            .ok_or_else(|| BrambleError::MissingReference("level start marker".to_string()))?;
        let end_tile = level
            .end
            .ok_or_else(|| BrambleError::MissingReference("level end marker".to_string()))?;

        let agents = level
            .agent_spawns
            .iter()
            .map(|_| Agent::new(agent_config))
            .collect();

        Ok(Self {
            grid: level.grid,
            player: Player::new(start_tile),
            agents,
            agent_spawns: level.agent_spawns,
            occupancy: OccupancySet::new(),
            start_tile,
            end_tile,
            pickaxe_tiles: level.pickaxe_tiles,
            phase: Phase::PlayerTurn,
            processing_turn: false,
            agents_frozen: false,
            pacing,
            dice,
            rng: StdRng::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    /// Opens the level: places every occupant, repopulates occupancy, grants
    /// first move budgets, refreshes visibility, and starts the player turn.
    pub fn start_level(&mut self) {
        self.player.set_tile(self.start_tile);

        self.occupancy.clear();
        self.occupancy.claim(self.start_tile);

        for (agent, &spawn) in self.agents.iter_mut().zip(&self.agent_spawns) {
            agent.place(spawn);
            self.occupancy.claim(spawn);
        }

        for agent in self.agents.iter_mut() {
            agent.set_steps_for_next_turn(&mut self.rng, self.agents_frozen);
        }

        info!(
            "level started: player at {}, goal at {}, {} agents",
            self.start_tile,
            self.end_tile,
            self.agents.len()
        );

        self.refresh_visibility();
        self.start_player_turn();
    }

    /// Rolls the player's move budget for this turn.
    ///
    /// A no-op returning 0 outside the player turn or once the player is
    /// frozen.
    pub fn roll_player_moves(&mut self) -> u32 {
        if self.phase != Phase::PlayerTurn || self.player.is_frozen() {
            return 0;
        }

        let roll = self.dice.roll(&mut self.rng);
        self.player.set_moves(roll);
        self.events.push(GameEvent::MovesRolled { moves: roll });
        roll
    }

    /// Sets the player's move budget directly (external dice UI).
    pub fn set_player_moves(&mut self, moves: u32) {
        self.player.set_moves(moves);
    }

    /// Attempts one player step in `direction`.
    ///
    /// Invalid-state invocations (wrong phase, frozen player, exhausted
    /// budget) and blocked targets are no-ops, not faults. A successful step
    /// runs pickup, collision, and level-complete checks; exhausting the
    /// budget hands the turn to the agents.
    pub async fn move_player(&mut self, direction: Direction) -> BrambleResult<()> {
        if self.phase != Phase::PlayerTurn
            || self.player.is_frozen()
            || self.player.moves_remaining() == 0
        {
            return Ok(());
        }

        let from = self.player.current_tile();
        let target = from + direction.delta();

        // With the pickaxe, walking into a rock breaks it first.
        if self.grid.is_rock(target) && self.player.has_pickaxe() && self.grid.break_rock(target) {
            self.events.push(GameEvent::RockBroken { tile: target });
        }

        if !self.grid.is_walkable(target, self.player.has_pickaxe()) {
            return Ok(());
        }

        self.occupancy.release(from);
        self.player.set_tile(target);
        self.occupancy.claim(target);
        self.player.spend_move();
        self.events.push(GameEvent::PlayerMoved { from, to: target });

        if let Some(idx) = self.pickaxe_tiles.iter().position(|&t| t == target) {
            self.pickaxe_tiles.remove(idx);
            self.player.collect_pickaxe();
            self.events.push(GameEvent::PickaxeCollected { tile: target });
        }

        self.refresh_visibility();

        if let Some(agent_id) = self.agent_at(target) {
            info!("player moved onto an agent tile, game over");
            self.events.push(GameEvent::AgentAttacked {
                agent: agent_id,
                tile: target,
            });
            self.enter_defeat(agent_id, target).await;
            return Ok(());
        }

        if self.check_level_complete(target) {
            self.freeze_all_agents();
            self.phase = Phase::Victory;
            self.events.push(GameEvent::LevelCompleted { tile: target });
            self.pacing.terminal().await;
            return Ok(());
        }

        if self.player.moves_remaining() == 0 {
            self.end_player_turn().await?;
        }

        Ok(())
    }

    /// Ends the player's turn and runs every agent's turn in list order.
    ///
    /// Guarded against re-entry: only one turn advance is ever in flight.
    /// Each agent's turn is awaited to completion before the next starts.
    pub async fn end_player_turn(&mut self) -> BrambleResult<()> {
        if self.processing_turn || self.phase != Phase::PlayerTurn {
            return Ok(());
        }
        self.processing_turn = true;
        self.phase = Phase::AgentTurns;

        for agent in self.agents.iter_mut() {
            agent.set_steps_for_next_turn(&mut self.rng, self.agents_frozen);
        }

        let player_tile = self.player.current_tile();
        let mut caught = None;

        for agent in self.agents.iter_mut() {
            if agent.is_moving() {
                continue;
            }

            let outcome = agent
                .take_turn(
                    &self.grid,
                    &mut self.occupancy,
                    player_tile,
                    self.agents_frozen,
                    &self.pacing,
                    &mut self.rng,
                    &mut self.events,
                )
                .await;

            if outcome == TurnOutcome::CaughtPlayer {
                caught = Some(agent.id());
                break;
            }
        }

        if let Some(agent_id) = caught {
            info!("an agent caught the player, game over");
            self.enter_defeat(agent_id, player_tile).await;
            self.processing_turn = false;
            return Ok(());
        }

        self.refresh_visibility();
        self.processing_turn = false;
        self.start_player_turn();
        Ok(())
    }

    /// Whether standing on `tile` completes the level.
    pub fn check_level_complete(&self, tile: TileCoord) -> bool {
        tile == self.end_tile
    }

    /// Freezes every agent and blocks future budget grants.
    pub fn freeze_all_agents(&mut self) {
        self.agents_frozen = true;
        for agent in &mut self.agents {
            agent.freeze();
        }
    }

    /// Current phase of the turn cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player occupant.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The agents, in turn order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The tile grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The shared occupancy set.
    pub fn occupancy(&self) -> &OccupancySet {
        &self.occupancy
    }

    /// The goal tile.
    pub fn end_tile(&self) -> TileCoord {
        self.end_tile
    }

    /// Drains and returns the buffered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Captures a serializable snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        let mut occupied_tiles: Vec<TileCoord> = self.occupancy.iter().copied().collect();
        occupied_tiles.sort_by_key(|t| (t.y, t.x));

        Snapshot {
            phase: self.phase,
            player: self.player.clone(),
            agents: self.agents.clone(),
            occupied_tiles,
            pickaxe_tiles: self.pickaxe_tiles.clone(),
        }
    }

    fn start_player_turn(&mut self) {
        // Budget grants are gated on turn completion, so the extra grant
        // after a skipped or stalled turn changes nothing.
        for agent in self.agents.iter_mut() {
            agent.set_steps_for_next_turn(&mut self.rng, self.agents_frozen);
        }

        self.phase = Phase::PlayerTurn;
        self.events.push(GameEvent::PlayerTurnStarted);
        self.check_player_agent_collision();
    }

    fn check_player_agent_collision(&mut self) {
        let player_tile = self.player.current_tile();
        if let Some(agent_id) = self.agent_at(player_tile) {
            info!("game over: player and agent on the same tile");
            self.player.freeze();
            self.phase = Phase::Defeat;
            self.events.push(GameEvent::PlayerCaught {
                agent: agent_id,
                tile: player_tile,
            });
        }
    }

    async fn enter_defeat(&mut self, agent: AgentId, tile: TileCoord) {
        self.player.freeze();
        self.phase = Phase::Defeat;
        self.events.push(GameEvent::PlayerCaught { agent, tile });
        self.pacing.terminal().await;
    }

    fn agent_at(&self, tile: TileCoord) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|a| a.is_initialized() && a.current_tile() == tile)
            .map(Agent::id)
    }

    /// Recomputes every occupant's visibility flag from scratch.
    ///
    /// Full recomputation avoids stale-visibility bugs from partial updates
    /// and is cheap at these occupant counts.
    fn refresh_visibility(&mut self) {
        let agent_tiles: Vec<TileCoord> = self
            .agents
            .iter()
            .filter(|a| a.is_initialized())
            .map(Agent::current_tile)
            .collect();

        self.player
            .update_visibility(&self.grid, &agent_tiles, &mut self.events);

        let player_tile = self.player.current_tile();
        for agent in self.agents.iter_mut() {
            agent.update_visibility(&self.grid, player_tile, &mut self.events);
        }

        debug!("--- visibility status ---");
        debug!(
            "player at {}: {}, forest: {}",
            player_tile,
            if self.player.is_visible() {
                "visible"
            } else {
                "invisible"
            },
            self.grid.is_forest(player_tile)
        );
        for agent in &self.agents {
            debug!(
                "agent {} at {}: {}, forest: {}",
                agent.id(),
                agent.current_tile(),
                if agent.is_visible() {
                    "visible"
                } else {
                    "invisible"
                },
                self.grid.is_forest(agent.current_tile())
            );
        }
    }
}

/// A serializable capture of engine state for diagnostics and save files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Phase at capture time
    pub phase: Phase,
    /// Player state
    pub player: Player,
    /// Agent states, in turn order
    pub agents: Vec<Agent>,
    /// Claimed tiles, sorted row-major for stable output
    pub occupied_tiles: Vec<TileCoord>,
    /// Uncollected pickaxe tiles
    pub pickaxe_tiles: Vec<TileCoord>,
}

impl Snapshot {
    /// Serializes the snapshot to pretty JSON.
    pub fn to_json(&self) -> BrambleResult<String> {
        serde_json::to_string_pretty(self).map_err(BrambleError::from)
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(json: &str) -> BrambleResult<Self> {
        serde_json::from_str(json).map_err(BrambleError::from)
    }
}
