//! Mob Components
//!
//! Species-specific runtime state. The world engine only creates these with
//! their starting values; combat and AI collaborators own them afterwards.

use bevy_ecs::prelude::*;
use world_events::{Cell, Species};

use crate::world::store::{EntityStore, StoreError};

/// Component: remaining hit points
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health(pub i32);

/// Component: ticks until a zombie may attack again
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cooldown(pub u32);

/// Component: ticks until a skeleton may shoot again
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reload(pub u32);

/// Component: growth progress of a sapling
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Growth(pub u32);

/// Component: the entity a hostile mob pursues
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunts(pub Entity);

/// Starting hit points per species
pub fn starting_health(species: Species) -> i32 {
    match species {
        Species::Player => 9,
        Species::Cow => 3,
        Species::Zombie => 5,
        Species::Skeleton => 3,
        Species::Plant => 1,
        Species::Arrow => 0,
    }
}

/// Creates an entity of `species` at `cell` with its starting state.
///
/// Hostile mobs remember `target` (normally the player) as their prey.
pub fn spawn_species(
    store: &mut EntityStore,
    species: Species,
    cell: Cell,
    target: Option<Entity>,
) -> Result<Entity, StoreError> {
    let health = Health(starting_health(species));
    let entity = match species {
        Species::Zombie => store.add(species, cell, (health, Cooldown(0)))?,
        Species::Skeleton => store.add(species, cell, (health, Reload(0)))?,
        Species::Plant => store.add(species, cell, (health, Growth(0)))?,
        Species::Arrow => store.add(species, cell, ())?,
        Species::Player | Species::Cow => store.add(species, cell, health)?,
    };
    if species.is_hostile() && species != Species::Arrow {
        if let Some(target) = target {
            store.insert(entity, Hunts(target))?;
        }
    }
    Ok(entity)
}
