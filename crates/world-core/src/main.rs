//! Survival World Generator
//!
//! Generates an episode from a seed and configuration, optionally runs it for
//! a number of steps, and writes the event log and a world snapshot.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use world_core::config::{Config, TargetBiome, DEFAULT_CONFIG_PATH};
use world_core::output::{take_snapshot, write_snapshot, EventLogger, SnapshotDetail};
use world_core::{Episode, Wander};
use world_events::Species;

/// Command line arguments for the generator
#[derive(Parser, Debug)]
#[command(name = "worldgen")]
#[command(about = "Procedural survival world generator and population simulator")]
struct Args {
    /// Base seed, overrides the configuration file
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration file (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Steps to simulate after generation
    #[arg(long, default_value_t = 0)]
    steps: u64,

    /// Target biome: none, natural, mountain, beaches or grassland
    #[arg(long)]
    biome: Option<TargetBiome>,

    /// Disable hostile mobs
    #[arg(long)]
    peaceful: bool,

    /// Write population events as JSONL
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write a JSON snapshot of the final world
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the material map
    #[arg(long)]
    map: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.episode.seed = Some(seed);
    }
    if let Some(biome) = args.biome {
        config.world.target_biome = biome;
    }
    if args.peaceful {
        config.world.peaceful_mode = true;
    }

    let mut episode = Episode::new(config).context("invalid configuration")?;
    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)
            .with_context(|| format!("could not create event log {}", path.display()))?,
        None => EventLogger::null(),
    };

    println!("Survival World Generator");
    println!("========================");
    println!("Base seed: {}", episode.base_seed());

    let generated = episode.reset().context("world generation failed")?;
    logger.log_batch(&episode.world_mut().drain_events())?;
    println!(
        "Generated {} world (episode seed {}): {} placed mobs, {} extra, {} tunnel cells",
        episode.world().area(),
        episode.world().seed(),
        generated.placements.len(),
        generated.extra.len(),
        generated.tunnels.count()
    );

    let mut wander = Wander::default();
    for _ in 0..args.steps {
        let outcome = episode.step(&mut wander)?;
        logger.log_batch(&episode.world_mut().drain_events())?;
        if outcome.step % 100 == 0 {
            print_population(&episode, outcome.step);
        }
        if outcome.done {
            println!("Episode over after {} steps", outcome.step);
            break;
        }
    }
    logger.flush()?;

    print_population(&episode, episode.step_count());
    let tally = logger.tally();
    for species in Species::mobs() {
        println!(
            "  {:<9} +{} -{}",
            species.name(),
            tally.spawned(*species),
            tally.despawned(*species)
        );
    }
    if let Some(path) = &args.events {
        println!("Wrote {} events to {}", logger.event_count(), path.display());
    }

    if let Some(path) = &args.snapshot {
        let detail = SnapshotDetail {
            entities: true,
            map: args.map,
        };
        let snapshot = take_snapshot(episode.world(), detail);
        write_snapshot(&snapshot, path)
            .with_context(|| format!("could not write snapshot {}", path.display()))?;
        println!("Wrote snapshot to {}", path.display());
    }

    if args.map {
        println!();
        for row in episode.world().grid().rows() {
            println!("{}", row);
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("loading {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn print_population(episode: &Episode, step: u64) {
    let world = episode.world();
    println!(
        "[Step {:>5}] daylight {:.2} | cows {} | zombies {} | skeletons {}",
        step,
        world.daylight(),
        world.count(Species::Cow),
        world.count(Species::Zombie),
        world.count(Species::Skeleton)
    );
}
