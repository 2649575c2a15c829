//! Bandolier - headless ammo simulation driver
//!
//! Loads ammo definitions, restores saved ammo settings, dresses a small
//! population, then runs firing and logistics for a number of ticks and
//! prints a summary. Settings are saved back on exit.

use std::path::PathBuf;

use bandolier::combat::{fire_shot, ShotOutcome, WeaponDef};
use bandolier::core::config::EngineConfig;
use bandolier::core::error::Result;
use bandolier::core::types::{EntityId, Vec2};
use bandolier::entity::agent::{Agent, Condition};
use bandolier::equip::allocate_for_agent;
use bandolier::session::{AmmoSession, Definitions};
use bandolier::tasks::{designate_for_loot, find_refill_job, LootAmmoTask, LootTarget, TaskScheduler, TaskStatus};
use bandolier::world::World;
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless ammo simulation
#[derive(Parser, Debug)]
#[command(name = "bandolier")]
#[command(about = "Run ammo consumption and logistics for a simulated population")]
struct Args {
    /// Ammo, category, weapon and kit definitions (TOML)
    #[arg(long, default_value = "data/ammo_defs.toml")]
    defs: PathBuf,

    /// Engine configuration (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Saved ammo settings, restored on start and written on exit
    #[arg(long, default_value = "ammo_settings.json")]
    snapshot: PathBuf,

    /// Number of agents to generate
    #[arg(long, default_value_t = 8)]
    agents: usize,

    /// Ticks to simulate
    #[arg(long, default_value_t = 300)]
    ticks: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    agents: usize,
    equipped: usize,
    shots_fired: u32,
    shots_suppressed: u32,
    tasks_succeeded: u32,
    tasks_failed: u32,
    rounds_in_kits: u32,
    rounds_on_ground: u32,
    targets_looted: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bandolier=info")))
        .init();

    let args = Args::parse();

    let defs = Definitions::load_from_toml(&args.defs)?;
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path)?,
        None => EngineConfig::default(),
    };

    let mut session = AmmoSession::new(defs, config);
    session.restore_or_rebuild(&args.snapshot);

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!(seed, agents = args.agents, ticks = args.ticks, "simulation starting");

    let mut world = World::new();
    let mut summary = RunSummary {
        seed,
        ticks: args.ticks,
        agents: args.agents,
        ..RunSummary::default()
    };

    summary.equipped = spawn_population(&mut world, &session, args.agents, &mut rng);
    scatter_ammo(&mut world, &session, &mut rng);

    let mut scheduler = TaskScheduler::new();
    let ids: Vec<EntityId> = world.agent_ids().to_vec();

    for tick in 0..args.ticks {
        for &id in &ids {
            let Some(agent) = world.agent_mut(id) else {
                continue;
            };
            if agent.condition != Condition::Standing || !rng.gen_bool(0.3) {
                continue;
            }
            match fire_shot(&session, agent) {
                ShotOutcome::Fired { .. } => summary.shots_fired += 1,
                ShotOutcome::Suppressed => summary.shots_suppressed += 1,
            }
        }

        // Halfway through, the first agent goes down and the last one loots them
        if tick == args.ticks / 2 && ids.len() >= 2 {
            down_and_loot(&mut world, &mut scheduler, ids[0], ids[ids.len() - 1]);
        }

        for &id in &ids {
            if scheduler.is_busy(id) {
                continue;
            }
            if let Some(job) = find_refill_job(&world, &session, id) {
                scheduler.assign(&mut world, job);
            }
        }

        for outcome in scheduler.tick(&mut world, &session) {
            match outcome.status {
                TaskStatus::Succeeded => summary.tasks_succeeded += 1,
                _ => summary.tasks_failed += 1,
            }
        }
    }

    summary.rounds_in_kits = world
        .agents()
        .flat_map(|a| a.worn_kits())
        .map(|k| k.total_count())
        .sum();
    summary.rounds_on_ground = world.stacks.iter().map(|s| s.count).sum();
    summary.targets_looted = world.agents().map(|a| a.records.targets_looted).sum();

    if let Err(e) = session.save(&args.snapshot) {
        tracing::warn!(path = %args.snapshot.display(), error = %e, "could not save ammo settings");
    }

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_summary(&summary),
    }
    Ok(())
}

/// Spawn armed agents and dress them; returns how many got a kit
fn spawn_population(world: &mut World, session: &AmmoSession, count: usize, rng: &mut ChaCha8Rng) -> usize {
    let mut ranged: Vec<&WeaponDef> = session.weapons.iter().filter(|w| !w.is_melee()).collect();
    ranged.sort_by(|a, b| a.id.cmp(&b.id));

    let mut equipped = 0;
    for i in 0..count {
        let position = Vec2::new(rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0));
        let mut agent = Agent::humanlike(format!("Agent {}", i + 1)).at(position);
        if !ranged.is_empty() {
            agent = agent.with_weapon(ranged[rng.gen_range(0..ranged.len())].id.clone());
        }
        if allocate_for_agent(session, &mut agent, rng).is_some() {
            equipped += 1;
        }
        world.spawn_agent(agent);
    }
    equipped
}

/// Drop a few stacks of every ammo type around the map
fn scatter_ammo(world: &mut World, session: &AmmoSession, rng: &mut ChaCha8Rng) {
    let mut ammo: Vec<_> = session.registry.iter().map(|a| a.id.clone()).collect();
    ammo.sort();
    for id in ammo {
        for _ in 0..3 {
            let position = Vec2::new(rng.gen_range(0.0..40.0), rng.gen_range(0.0..40.0));
            world.spawn_stack(id.clone(), rng.gen_range(10..80), position);
        }
    }
}

fn down_and_loot(world: &mut World, scheduler: &mut TaskScheduler, victim: EntityId, looter: EntityId) {
    scheduler.cancel(world, victim);
    if let Some(agent) = world.agent_mut(victim) {
        agent.condition = Condition::Downed;
    }
    let target = LootTarget::Agent(victim);
    if designate_for_loot(world, target) {
        scheduler.assign(world, LootAmmoTask::new(looter, target));
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Bandolier Run");
    println!("=============");
    println!("Seed:              {}", summary.seed);
    println!("Ticks:             {}", summary.ticks);
    println!("Agents equipped:   {}/{}", summary.equipped, summary.agents);
    println!("Shots fired:       {}", summary.shots_fired);
    println!("Shots suppressed:  {}", summary.shots_suppressed);
    println!("Tasks succeeded:   {}", summary.tasks_succeeded);
    println!("Tasks failed:      {}", summary.tasks_failed);
    println!("Rounds in kits:    {}", summary.rounds_in_kits);
    println!("Rounds on ground:  {}", summary.rounds_on_ground);
    println!("Targets looted:    {}", summary.targets_looted);
}
