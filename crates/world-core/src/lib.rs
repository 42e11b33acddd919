//! Survival World Engine
//!
//! Chunked grid world with layered-noise terrain generation, initial mob
//! placement and an adaptive population balancer.

pub mod components;
pub mod config;
pub mod episode;
pub mod output;
pub mod setup;
pub mod systems;
pub mod world;

pub use config::{Config, ConfigError, EpisodeConfig, TargetBiome, WorldConfig};
pub use episode::{episode_seed, Episode, SimError, StepOutcome};
pub use setup::{generate_world, Generated, Placement, TerrainError, TunnelMask};
pub use systems::{EntityUpdater, Idle, Wander};
pub use world::{ChunkKey, GridError, Region, StoreError, World, WorldRng};
