//! Universe demo.
//!
//! Populates a universe with randomly composed entities, runs a few views
//! over it, and reports what they saw.

mod components;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use universe::{EntityId, Filter, Universe, UniverseConfig, View, components};

use crate::components::{Frozen, Labelled, Movable, Name, Player, PlayerController, Position, Velocity};

/// Seconds advanced per movement step.
const STEP: f32 = 0.5;

#[derive(Parser, Debug)]
#[command(name = "universe_demo")]
#[command(about = "Populate a universe and query it through views")]
struct Args {
    /// Number of entities to spawn
    #[arg(short, long, default_value = "1000")]
    entities: usize,

    /// Seed for the random population
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Universe configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON instead of logging it
    #[arg(long)]
    json: bool,
}

/// What the views observed.
#[derive(Debug, Serialize)]
struct Summary {
    entities: usize,
    labelled: usize,
    movable: usize,
    frozen: usize,
    position_sum: [f32; 2],
    player: Option<EntityId>,
    player_position: Option<Position>,
    player_name: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("universe_demo=info".parse()?)
                .add_directive("universe=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => UniverseConfig::new().with_initial_capacity(args.entities),
    };
    info!(
        entities = args.entities,
        seed = args.seed,
        strict_removal = config.strict_removal,
        "Starting universe demo"
    );

    let mut universe = Universe::with_config(config);
    let mut rng = StdRng::seed_from_u64(args.seed);
    populate(&mut universe, args.entities, &mut rng)?;

    let player_view = View::<Player>::new()?;
    let player = player_view.spawn(
        &mut universe,
        Player {
            position: Some(Position::new(0.0, 0.0)),
            name: Some(Name::new("Player")),
            controller: Some(PlayerController),
            velocity: Some(Velocity { dx: 1.0, dy: 0.5 }),
            ..Default::default()
        },
    )?;
    info!(entity = %player, "Spawned player");

    let movable = View::<Movable>::new()?;
    let moved = step(&mut universe, &movable)?;
    debug!(moved, "Movement step finished");

    let summary = summarize(&universe, &player_view, &movable, player)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            entities = summary.entities,
            labelled = summary.labelled,
            movable = summary.movable,
            frozen = summary.frozen,
            sum_x = summary.position_sum[0],
            sum_y = summary.position_sum[1],
            "Universe summary"
        );
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<UniverseConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: UniverseConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    info!(path = %path.display(), "Loaded universe config");
    Ok(config)
}

/// Spawn `count` entities. Every entity gets a position and a name; roughly
/// half move, and a tenth of the movers are frozen.
fn populate(universe: &mut Universe, count: usize, rng: &mut StdRng) -> Result<()> {
    for i in 0..count {
        let position = Position::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0));
        let name = Name::new(format!("Entity {i}"));
        let id = universe.spawn(components![position, name])?;

        if rng.gen_bool(0.5) {
            let velocity = Velocity {
                dx: rng.gen_range(-1.0..1.0),
                dy: rng.gen_range(-1.0..1.0),
            };
            universe.add_component(id, velocity)?;
            if rng.gen_bool(0.1) {
                universe.add_component(id, Frozen)?;
            }
        }
    }
    info!(count = universe.len(), "Populated universe");
    Ok(())
}

/// Advance every movable entity by one step. Returns how many moved.
fn step(universe: &mut Universe, movable: &View<Movable>) -> Result<usize> {
    let updates: Vec<(EntityId, Position)> = movable
        .iter(universe)
        .filter_map(|item| {
            let position = item.position?;
            let velocity = item.velocity?;
            Some((item.id, position.advanced(velocity, STEP)))
        })
        .collect();

    for (id, position) in &updates {
        movable.store(
            universe,
            *id,
            Movable {
                position: Some(*position),
                ..Default::default()
            },
        )?;
    }
    Ok(updates.len())
}

fn summarize(
    universe: &Universe,
    player_view: &View<Player>,
    movable: &View<Movable>,
    player: EntityId,
) -> Result<Summary> {
    let labelled = View::<Labelled>::new()?;
    let position_sum = labelled
        .iter(universe)
        .filter_map(|item| item.position)
        .fold([0.0f32; 2], |[x, y], p| [x + p.x, y + p.y]);

    let frozen = Filter::new().with::<Frozen>();
    let (found, ok) = player_view.maybe_get(universe, player);

    Ok(Summary {
        entities: universe.len(),
        labelled: labelled.count(universe),
        movable: movable.count(universe),
        frozen: universe.filter(&frozen).count(),
        position_sum,
        player: ok.then_some(found.id),
        player_position: found.position,
        player_name: found.name.map(|name| name.value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_is_deterministic_per_seed() {
        let mut first = Universe::new();
        let mut second = Universe::new();
        populate(&mut first, 50, &mut StdRng::seed_from_u64(9)).unwrap();
        populate(&mut second, 50, &mut StdRng::seed_from_u64(9)).unwrap();

        let movable = View::<Movable>::new().unwrap();
        assert_eq!(first.len(), 50);
        assert_eq!(movable.count(&first), movable.count(&second));
    }

    #[test]
    fn test_step_skips_frozen_entities() {
        let mut universe = Universe::new();
        let start = Position::new(1.0, 1.0);
        let velocity = Velocity { dx: 2.0, dy: 0.0 };
        let moving = universe.spawn(components![start, velocity]).unwrap();
        let frozen = universe.spawn(components![start, velocity, Frozen]).unwrap();

        let movable = View::<Movable>::new().unwrap();
        assert_eq!(step(&mut universe, &movable).unwrap(), 1);

        assert_eq!(universe.read::<Position>(moving), Some(&Position::new(2.0, 1.0)));
        assert_eq!(universe.read::<Position>(frozen), Some(&start));
        assert!(universe.has_component::<Velocity>(moving));
    }

    #[test]
    fn test_summary_counts() {
        let mut universe = Universe::new();
        universe
            .spawn(components![Position::new(1.0, 2.0), Name::new("a")])
            .unwrap();
        universe
            .spawn(components![Position::new(3.0, 4.0), Name::new("b"), Velocity::default(), Frozen])
            .unwrap();

        let player_view = View::<Player>::new().unwrap();
        let player = player_view
            .spawn(
                &mut universe,
                Player {
                    position: Some(Position::new(0.0, 0.0)),
                    name: Some(Name::new("Player")),
                    controller: Some(PlayerController),
                    ..Default::default()
                },
            )
            .unwrap();

        let movable = View::<Movable>::new().unwrap();
        let summary = summarize(&universe, &player_view, &movable, player).unwrap();
        assert_eq!(summary.entities, 3);
        assert_eq!(summary.labelled, 3);
        assert_eq!(summary.movable, 0);
        assert_eq!(summary.frozen, 1);
        assert_eq!(summary.position_sum, [4.0, 6.0]);
        assert_eq!(summary.player, Some(player));
        assert_eq!(summary.player_position, Some(Position::new(0.0, 0.0)));
        assert_eq!(summary.player_name.as_deref(), Some("Player"));
    }
}
