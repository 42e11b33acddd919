//! Entity Updates
//!
//! Per-step behaviour hook. The engine decides which entities are updated and
//! in what order; what an update does belongs to the collaborator.

use bevy_ecs::entity::Entity;
use rand::Rng;
use world_events::{DespawnCause, Material, Species};

use crate::components::entity::Facing;
use crate::components::mobs::Health;
use crate::world::{StoreError, World};

/// Behaviour collaborator invoked for entities near the player.
pub trait EntityUpdater {
    fn update(&mut self, world: &mut World, entity: Entity) -> Result<(), StoreError>;
}

/// Updater that leaves every entity alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct Idle;

impl EntityUpdater for Idle {
    fn update(&mut self, _world: &mut World, _entity: Entity) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Materials a species can walk onto.
pub fn walkable_for(species: Species) -> &'static [Material] {
    match species {
        Species::Player | Species::Cow | Species::Zombie => {
            &[Material::Grass, Material::Sand, Material::Path]
        }
        Species::Skeleton => &[Material::Path],
        Species::Arrow => &[
            Material::Grass,
            Material::Sand,
            Material::Path,
            Material::Water,
            Material::Lava,
        ],
        Species::Plant => &[],
    }
}

/// Random walk for mobs: with probability one half turn to a random direction
/// and step forward if the cell ahead is free. Mobs out of health are removed.
#[derive(Debug, Clone, Copy)]
pub struct Wander {
    pub move_probability: f64,
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            move_probability: 0.5,
        }
    }
}

impl EntityUpdater for Wander {
    fn update(&mut self, world: &mut World, entity: Entity) -> Result<(), StoreError> {
        let Some(species) = world.store().species_of(entity) else {
            return Ok(());
        };
        if !Species::mobs().contains(&species) {
            return Ok(());
        }
        if world.store().get::<Health>(entity).is_some_and(|h| h.0 <= 0) {
            return world.remove(entity, DespawnCause::Behavior);
        }
        if world.rng().gen::<f64>() >= self.move_probability {
            return Ok(());
        }

        let facing = Facing::ALL[world.rng().gen_range(0..Facing::ALL.len())];
        world.store_mut().set_facing(entity, facing)?;
        let Some(cell) = world.store().cell_of(entity) else {
            return Ok(());
        };
        let target = facing.ahead(cell);
        if world.is_free(target, walkable_for(species)) {
            world.move_to(entity, target)?;
        }
        Ok(())
    }
}

/// Runs `updater` on every live entity within Chebyshev `radius` of the
/// player, in insertion order. Entities removed earlier in the same pass are
/// skipped. Returns the number of updates made.
pub fn update_entities(
    world: &mut World,
    updater: &mut dyn EntityUpdater,
    radius: i32,
) -> Result<usize, StoreError> {
    let Some(player) = world.player_cell() else {
        return Ok(0);
    };
    let entities = world.entities().to_vec();
    let mut updated = 0;
    for entity in entities {
        let Some(cell) = world.store().cell_of(entity) else {
            continue;
        };
        if player.chebyshev(cell) < radius {
            updater.update(world, entity)?;
            updated += 1;
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use world_events::{Area, Cell, SpawnCause};

    fn grass_world() -> World {
        let config = WorldConfig {
            area: Area::new(48, 48),
            chunk_size: Area::new(12, 12),
            ..WorldConfig::default()
        };
        let mut world = World::new(config).unwrap();
        world.reset(3);
        for index in 0..world.area().cell_count() {
            let cell = world.area().cell_at(index);
            world.set(cell, Material::Grass).unwrap();
        }
        world
    }

    struct Recorder(Vec<Entity>);

    impl EntityUpdater for Recorder {
        fn update(&mut self, _world: &mut World, entity: Entity) -> Result<(), StoreError> {
            self.0.push(entity);
            Ok(())
        }
    }

    #[test]
    fn test_only_nearby_entities_update() {
        let mut world = grass_world();
        let player = world.spawn_player(Cell::new(10, 10)).unwrap();
        let near = world.spawn(Species::Cow, Cell::new(27, 10), SpawnCause::Behavior).unwrap();
        world.spawn(Species::Cow, Cell::new(28, 10), SpawnCause::Behavior).unwrap();
        let diagonal = world.spawn(Species::Zombie, Cell::new(0, 0), SpawnCause::Behavior).unwrap();

        let mut recorder = Recorder(Vec::new());
        let updated = update_entities(&mut world, &mut recorder, 18).unwrap();
        assert_eq!(updated, 3);
        assert_eq!(recorder.0, vec![player, near, diagonal]);
    }

    #[test]
    fn test_no_player_no_updates() {
        let mut world = grass_world();
        world.spawn(Species::Cow, Cell::new(1, 1), SpawnCause::Behavior).unwrap();
        let mut recorder = Recorder(Vec::new());
        assert_eq!(update_entities(&mut world, &mut recorder, 18).unwrap(), 0);
    }

    #[test]
    fn test_wander_keeps_index_exact() {
        let mut world = grass_world();
        world.spawn_player(Cell::new(24, 24)).unwrap();
        for i in 0..12 {
            world
                .spawn(Species::Cow, Cell::new(14 + i, 20), SpawnCause::Behavior)
                .unwrap();
        }
        let mut wander = Wander::default();
        for _ in 0..200 {
            update_entities(&mut world, &mut wander, 18).unwrap();
        }
        world.store().assert_index_consistent();
        assert_eq!(world.count(Species::Cow), 12);
        for &entity in world.entities() {
            let cell = world.store().cell_of(entity).unwrap();
            assert_eq!(world.get(cell), Material::Grass);
        }
    }

    #[test]
    fn test_wander_respects_terrain() {
        let mut world = grass_world();
        world.spawn_player(Cell::new(5, 5)).unwrap();
        let skeleton = world
            .spawn(Species::Skeleton, Cell::new(8, 8), SpawnCause::Behavior)
            .unwrap();
        let mut wander = Wander {
            move_probability: 1.0,
        };
        for _ in 0..50 {
            update_entities(&mut world, &mut wander, 18).unwrap();
        }
        assert_eq!(world.store().cell_of(skeleton), Some(Cell::new(8, 8)));
    }

    #[test]
    fn test_dead_mobs_removed() {
        let mut world = grass_world();
        world.spawn_player(Cell::new(5, 5)).unwrap();
        let cow = world.spawn(Species::Cow, Cell::new(6, 6), SpawnCause::Behavior).unwrap();
        world.store_mut().get_mut::<Health>(cow).unwrap().0 = 0;
        update_entities(&mut world, &mut Idle, 18).unwrap();
        assert!(world.store().contains(cow));
        update_entities(&mut world, &mut Wander::default(), 18).unwrap();
        assert!(!world.store().contains(cow));
        assert!(world.drain_events().last().unwrap().is_despawn());
    }
}
