//! Episode Driver
//!
//! Owns a world across episodes: derives per-episode seeds, regenerates the
//! world on reset and advances the clock, entity updates and balancing on
//! each step.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::info;
use world_events::{Cell, Species};

use crate::config::{Config, ConfigError, EpisodeConfig};
use crate::setup::{generate_world, Generated, TerrainError};
use crate::systems::{balance_world, update_daylight, update_entities};
use crate::systems::{BalanceReport, EntityUpdater};
use crate::world::{StoreError, World};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("world generation failed: {0}")]
    Terrain(#[from] TerrainError),
    #[error("entity store: {0}")]
    Store(#[from] StoreError),
    #[error("step called before the first reset")]
    NotStarted,
}

/// Seed of episode `episode` under `base_seed`, in `0..2^31 - 1`.
pub fn episode_seed(base_seed: u64, episode: u64) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    rng.set_stream(episode);
    rng.gen_range(0..(1u64 << 31) - 1)
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub step: u64,
    pub daylight: f64,
    pub updated: usize,
    /// Present on balancing steps
    pub balance: Option<BalanceReport>,
    pub done: bool,
}

pub struct Episode {
    world: World,
    config: EpisodeConfig,
    base_seed: u64,
    step: u64,
    started: bool,
}

impl Episode {
    /// Validates the whole configuration. Without a configured seed the base
    /// seed is drawn from the OS generator.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        let base_seed = config.episode.seed.unwrap_or_else(rand::random);
        Ok(Self {
            world: World::new(config.world)?,
            config: config.episode,
            base_seed,
            step: 0,
            started: false,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Episodes started so far.
    pub fn episode(&self) -> u64 {
        self.world.episode()
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    /// Starts the next episode on a freshly generated world with the player
    /// at the centre of the area.
    pub fn reset(&mut self) -> Result<Generated, SimError> {
        let episode = self.world.episode() + 1;
        let seed = episode_seed(self.base_seed, episode);
        self.world.reset(seed);
        self.step = 0;
        self.started = true;
        update_daylight(&mut self.world, 0);

        let start = self.world.area().center();
        self.world.spawn_player(start)?;
        let generated = generate_world(&mut self.world, start)?;

        info!(
            episode,
            seed,
            cows = self.world.count(Species::Cow),
            zombies = self.world.count(Species::Zombie),
            skeletons = self.world.count(Species::Skeleton),
            "episode reset"
        );
        Ok(generated)
    }

    /// Advances one step: clock, entity updates near the player and, every
    /// `balance_interval` steps, population balancing.
    pub fn step(&mut self, updater: &mut dyn EntityUpdater) -> Result<StepOutcome, SimError> {
        if !self.started {
            return Err(SimError::NotStarted);
        }
        self.step += 1;
        self.world.set_tick(self.step);
        update_daylight(&mut self.world, self.step);

        let updated = update_entities(&mut self.world, updater, self.config.update_radius)?;
        let balance = if self.step % self.config.balance_interval == 0 {
            Some(balance_world(&mut self.world)?)
        } else {
            None
        };

        Ok(StepOutcome {
            step: self.step,
            daylight: self.world.daylight(),
            updated,
            balance,
            done: self.done(),
        })
    }

    /// The configured length has elapsed or the player is gone.
    pub fn done(&self) -> bool {
        if !self.started {
            return false;
        }
        let over = self.config.length > 0 && self.step >= self.config.length;
        over || self.world.player().is_none()
    }

    /// Where the player currently stands.
    pub fn player_cell(&self) -> Option<Cell> {
        self.world.player_cell()
    }
}
