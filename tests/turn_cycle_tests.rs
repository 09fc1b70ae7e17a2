//! Integration tests for the full turn cycle: player turns, serial agent
//! turns, terminal states, and the occupancy invariant across rounds.

use bramble::{
    AgentConfig, DiceRange, Direction, Engine, GameEvent, LevelMap, Pacing, Phase, TileCoord,
};

fn engine_for(map: &str, agent_config: AgentConfig, seed: u64) -> Engine {
    let level = LevelMap::parse(map, 16.0).expect("test map must parse");
    let mut engine =
        Engine::with_config(level, agent_config, Pacing::none(), DiceRange::default(), seed)
            .expect("test map must have start and end markers");
    engine.start_level();
    engine
}

#[tokio::test]
async fn test_victory_mid_budget_skips_agent_turns() {
    let mut engine = engine_for("S.E....a", AgentConfig::default(), 3);
    engine.set_player_moves(5);

    engine.move_player(Direction::Right).await.unwrap();
    engine.move_player(Direction::Right).await.unwrap();

    assert_eq!(engine.phase(), Phase::Victory);
    assert!(engine.player().moves_remaining() > 0);
    for agent in engine.agents() {
        assert!(agent.is_frozen());
    }

    // Agents never got a turn: the leftover budget was discarded with the win
    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::LevelCompleted { .. })));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::AgentMoved { .. })));
}

#[tokio::test]
async fn test_player_stepping_onto_agent_is_defeat() {
    let mut engine = engine_for("Sa.E", AgentConfig::default(), 5);
    engine.set_player_moves(3);

    engine.move_player(Direction::Right).await.unwrap();

    assert_eq!(engine.phase(), Phase::Defeat);
    assert!(engine.player().is_frozen());

    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::AgentAttacked { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerCaught { .. })));
}

#[tokio::test]
async fn test_chasing_agent_catches_idle_player() {
    // Open corridor, no forest: the agent sees the player immediately and
    // has enough budget to close the two-tile gap.
    let config = AgentConfig {
        min_moves: 2,
        max_moves: 3,
        wander_when_no_target: true,
    };
    let mut engine = engine_for("S.a.E", config, 9);

    engine.end_player_turn().await.unwrap();

    assert_eq!(engine.phase(), Phase::Defeat);
    assert!(engine.player().is_frozen());

    let events = engine.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerCaught { tile, .. } if *tile == TileCoord::new(0, 0))));
}

#[tokio::test]
async fn test_occupancy_invariant_holds_across_rounds() {
    // The rock row keeps the agent away from the player's corridor, so the
    // cycle runs undisturbed until the player walks to the goal.
    let map = "S...E\n\
               #####\n\
               ..a..";
    let mut engine = engine_for(map, AgentConfig::default(), 21);

    for _ in 0..3 {
        assert_eq!(engine.phase(), Phase::PlayerTurn);
        engine.set_player_moves(1);
        engine.move_player(Direction::Right).await.unwrap();

        // One claim per occupant, each on its own current tile
        assert_eq!(engine.occupancy().len(), 2);
        assert!(engine.occupancy().is_claimed(engine.player().current_tile()));
        for agent in engine.agents() {
            assert!(engine.occupancy().is_claimed(agent.current_tile()));
            assert!(!agent.is_moving());
            assert!(agent.moves_remaining() > 0);
        }
    }

    engine.set_player_moves(1);
    engine.move_player(Direction::Right).await.unwrap();
    assert_eq!(engine.phase(), Phase::Victory);
}

#[tokio::test]
async fn test_snapshot_survives_mid_game_round_trip() {
    let mut engine = engine_for(
        "S...E\n#####\n..a..",
        AgentConfig::default(),
        33,
    );
    engine.set_player_moves(1);
    engine.move_player(Direction::Right).await.unwrap();

    let snapshot = engine.snapshot();
    let restored = bramble::Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();

    assert_eq!(restored.phase, Phase::PlayerTurn);
    assert_eq!(
        restored.player.current_tile(),
        engine.player().current_tile()
    );
    assert_eq!(restored.agents.len(), 1);
    assert_eq!(restored.occupied_tiles.len(), 2);
}
