//! World Setup
//!
//! Procedural generation of a fresh episode: terrain, initial mobs and the
//! configured extra spawns.

pub mod extra;
pub mod noise;
pub mod objects;
pub mod rules;
pub mod terrain;

pub use extra::spawn_extra;
pub use objects::{place_objects, placement_band, Placement};
pub use terrain::{generate_terrain, BiomeProfile, TunnelMask};

use thiserror::Error;
use world_events::Cell;

use crate::world::{GridError, StoreError, World};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("noise sample at ({x}, {y}, {z}) is not finite")]
    NonFiniteNoise { x: f64, y: f64, z: f64 },
    #[error("terrain write failed: {0}")]
    Grid(#[from] GridError),
    #[error("mob placement failed: {0}")]
    Placement(StoreError),
}

/// Everything the generation passes produced.
#[derive(Debug, Clone)]
pub struct Generated {
    pub tunnels: TunnelMask,
    /// Mobs from the placement pass, in creation order
    pub placements: Vec<Placement>,
    /// Mobs from the extra spawn list, in creation order
    pub extra: Vec<Placement>,
}

/// Runs terrain, placement and extra spawns around `start`, in that order.
pub fn generate_world(world: &mut World, start: Cell) -> Result<Generated, TerrainError> {
    let tunnels = generate_terrain(world, start)?;
    let placements = place_objects(world, start, &tunnels)?;
    let extra = spawn_extra(world, start)?;
    Ok(Generated {
        tunnels,
        placements,
        extra,
    })
}
