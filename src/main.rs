//! # Bramble Main Entry Point
//!
//! Headless runner: loads a level, drives the turn cycle with a simple
//! goal-seeking player policy, and prints the event stream. Useful for
//! watching the simulation and for soak-testing levels without a frontend.

use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use bramble::{
    AgentConfig, BrambleResult, DiceRange, Direction, Engine, GameEvent, LevelMap, Pacing, Phase,
};

/// Command line arguments for the bramble headless runner.
#[derive(Parser, Debug)]
#[command(name = "bramble")]
#[command(about = "A turn-based grid chase simulation, run headless")]
#[command(version)]
struct Args {
    /// Random seed for dice rolls and agent wandering
    #[arg(short, long, default_value_t = 12345)]
    seed: u64,

    /// Path to an ASCII level map (defaults to the built-in demo level)
    #[arg(short, long)]
    map: Option<std::path::PathBuf>,

    /// Stop after this many player turns
    #[arg(long, default_value_t = 200)]
    max_rounds: u32,

    /// Disable pacing delays and run at full speed
    #[arg(long)]
    fast: bool,
}

#[tokio::main]
async fn main() -> BrambleResult<()> {
    env_logger::init();

    let args = Args::parse();
    info!("starting bramble v{} with seed {}", bramble::VERSION, args.seed);

    let level = match &args.map {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            LevelMap::parse(&text, bramble::config::DEFAULT_TILE_SIZE)?
        }
        None => LevelMap::demo(),
    };

    let pacing = if args.fast {
        Pacing::none()
    } else {
        Pacing::default()
    };

    let mut engine = Engine::with_config(
        level,
        AgentConfig::default(),
        pacing,
        DiceRange::default(),
        args.seed,
    )?;
    engine.start_level();

    let mut policy_rng = StdRng::seed_from_u64(args.seed.wrapping_add(1));

    for round in 1..=args.max_rounds {
        if engine.phase() != Phase::PlayerTurn {
            break;
        }

        let moves = engine.roll_player_moves();
        info!("round {}: player rolled {}", round, moves);

        for _ in 0..moves {
            if engine.phase() != Phase::PlayerTurn {
                break;
            }
            let direction = choose_direction(&engine, &mut policy_rng);
            engine.move_player(direction).await?;
            print_events(engine.drain_events());
        }

        // Spend any budget left over from blocked steps.
        if engine.phase() == Phase::PlayerTurn {
            engine.end_player_turn().await?;
            print_events(engine.drain_events());
        }
    }

    match engine.phase() {
        Phase::Victory => info!("the player escaped"),
        Phase::Defeat => info!("the player was caught"),
        _ => warn!("round limit reached without a terminal state"),
    }

    let snapshot = engine.snapshot();
    println!("{}", snapshot.to_json()?);

    Ok(())
}

/// Picks the player's next step: along the shortest path to the goal when
/// one exists, otherwise a uniformly random walkable direction.
fn choose_direction(engine: &Engine, rng: &mut StdRng) -> Direction {
    let from = engine.player().current_tile();
    let path = engine.grid().find_path(from, engine.end_tile());

    if let Some(&next) = path.first() {
        for direction in Direction::ALL {
            if from + direction.delta() == next {
                return direction;
            }
        }
    }

    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    for direction in directions {
        let target = from + direction.delta();
        if engine
            .grid()
            .is_walkable(target, engine.player().has_pickaxe())
        {
            return direction;
        }
    }
    directions[0]
}

fn print_events(events: Vec<GameEvent>) {
    for event in events {
        println!("{:?}", event);
    }
}
