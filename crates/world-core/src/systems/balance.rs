//! Population Balancing
//!
//! Nudges per-chunk mob counts towards a target band that depends on how much
//! suitable ground the chunk has and on the time of day. At most one spawn or
//! one despawn happens per chunk and species on each pass.

use bevy_ecs::entity::Entity;
use rand::Rng;
use tracing::debug;
use world_events::{DespawnCause, Material, SpawnCause, Species};

use crate::world::{ChunkKey, Region, StoreError, World};

/// Desired population range of one species in one chunk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBand {
    pub min: f64,
    pub max: f64,
}

impl TargetBand {
    /// Counts strictly below this trigger a spawn attempt.
    pub fn floor_min(&self) -> usize {
        self.min.floor().max(0.0) as usize
    }

    /// Counts strictly above this trigger a despawn attempt.
    pub fn ceil_max(&self) -> usize {
        self.max.ceil().max(0.0) as usize
    }
}

/// Balancing parameters of one species.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesBalance {
    pub species: Species,
    /// Ground a new instance may appear on
    pub material: Material,
    /// Minimum Chebyshev distance from the player for a spawn
    pub spawn_distance: i32,
    /// Minimum Chebyshev distance from the player for a despawn
    pub despawn_distance: i32,
    pub spawn_probability: f64,
    pub despawn_probability: f64,
    /// Target band from the chunk's count of `material` cells and the daylight
    pub target: fn(usize, f64) -> TargetBand,
}

pub const COW_BALANCE: SpeciesBalance = SpeciesBalance {
    species: Species::Cow,
    material: Material::Grass,
    spawn_distance: 5,
    despawn_distance: 5,
    spawn_probability: 0.01,
    despawn_probability: 0.1,
    target: |grass, daylight| TargetBand {
        min: if grass < 30 { 0.0 } else { 1.0 },
        max: 1.5 + daylight,
    },
};

pub const ZOMBIE_BALANCE: SpeciesBalance = SpeciesBalance {
    species: Species::Zombie,
    material: Material::Grass,
    spawn_distance: 6,
    despawn_distance: 0,
    spawn_probability: 0.3,
    despawn_probability: 0.4,
    target: |grass, daylight| {
        let darkness = 3.5 - 3.0 * daylight;
        TargetBand {
            min: if grass < 50 { 0.0 } else { darkness },
            max: darkness,
        }
    },
};

pub const SKELETON_BALANCE: SpeciesBalance = SpeciesBalance {
    species: Species::Skeleton,
    material: Material::Path,
    spawn_distance: 7,
    despawn_distance: 7,
    spawn_probability: 0.1,
    despawn_probability: 0.1,
    target: |path, _| TargetBand {
        min: if path < 6 { 0.0 } else { 1.0 },
        max: 2.0,
    },
};

/// Species in the order they are balanced within a chunk.
pub const BALANCE_ORDER: [SpeciesBalance; 3] = [COW_BALANCE, ZOMBIE_BALANCE, SKELETON_BALANCE];

/// What one balancing pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceReport {
    pub spawned: usize,
    pub despawned: usize,
}

impl BalanceReport {
    fn absorb(&mut self, action: Option<BalanceAction>) {
        match action {
            Some(BalanceAction::Spawned(_)) => self.spawned += 1,
            Some(BalanceAction::Despawned(_)) => self.despawned += 1,
            None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BalanceAction {
    Spawned(Entity),
    Despawned(Entity),
}

/// Balances every chunk in row-major order. Hostiles are skipped in peaceful
/// mode and nothing happens while mobs are disabled.
pub fn balance_world(world: &mut World) -> Result<BalanceReport, StoreError> {
    let mut report = BalanceReport::default();
    if !world.config().enable_mobs {
        return Ok(report);
    }
    let hostiles = world.config().hostiles_enabled();
    let chunks: Vec<(ChunkKey, Region)> = world.chunks().collect();

    for (key, region) in chunks {
        for rule in BALANCE_ORDER.iter().filter(|r| hostiles || !r.species.is_hostile()) {
            report.absorb(balance_chunk(world, key, region, rule)?);
        }
    }
    if report != BalanceReport::default() {
        debug!(
            tick = world.tick(),
            spawned = report.spawned,
            despawned = report.despawned,
            "population balanced"
        );
    }
    Ok(report)
}

fn balance_chunk(
    world: &mut World,
    key: ChunkKey,
    region: Region,
    rule: &SpeciesBalance,
) -> Result<Option<BalanceAction>, StoreError> {
    let count = world.store().count_in_chunk(key, rule.species);
    let mask = world.mask(region, rule.material);
    let band = (rule.target)(mask.count(), world.daylight());

    if count < band.floor_min() && world.rng().gen::<f64>() < rule.spawn_probability {
        if mask.is_empty() {
            return Ok(None);
        }
        let index = world.rng().gen_range(0..mask.count());
        let Some(cell) = mask.nth(index) else {
            return Ok(None);
        };
        let away = world
            .player_distance(cell)
            .map_or(true, |d| d >= rule.spawn_distance);
        if !world.store().is_free(cell) || !away {
            return Ok(None);
        }
        let entity = world.spawn(rule.species, cell, SpawnCause::Balance)?;
        debug!(species = %rule.species, %cell, chunk = ?key, "balance spawn");
        return Ok(Some(BalanceAction::Spawned(entity)));
    }

    if count > band.ceil_max() && world.rng().gen::<f64>() < rule.despawn_probability {
        let members = world.store().members_of(key, rule.species);
        if members.is_empty() {
            return Ok(None);
        }
        let entity = members[world.rng().gen_range(0..members.len())];
        let Some(cell) = world.store().cell_of(entity) else {
            return Ok(None);
        };
        let away = world
            .player_distance(cell)
            .map_or(true, |d| d >= rule.despawn_distance);
        if !away {
            return Ok(None);
        }
        world.remove(entity, DespawnCause::Balance)?;
        debug!(species = %rule.species, %cell, chunk = ?key, "balance despawn");
        return Ok(Some(BalanceAction::Despawned(entity)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use world_events::{Area, Cell};

    fn grass_world(config: WorldConfig, player: Cell) -> World {
        let mut world = World::new(config).unwrap();
        world.reset(31);
        for index in 0..world.area().cell_count() {
            let cell = world.area().cell_at(index);
            world.set(cell, Material::Grass).unwrap();
        }
        world.spawn_player(player).unwrap();
        world
    }

    fn small_config() -> WorldConfig {
        WorldConfig {
            area: Area::new(24, 24),
            chunk_size: Area::new(12, 12),
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_target_band_rounding() {
        let band = TargetBand { min: 3.5, max: 3.5 };
        assert_eq!(band.floor_min(), 3);
        assert_eq!(band.ceil_max(), 4);
        let band = TargetBand { min: 0.0, max: 2.0 };
        assert_eq!(band.floor_min(), 0);
        assert_eq!(band.ceil_max(), 2);
    }

    #[test]
    fn test_band_formulas() {
        let day = (ZOMBIE_BALANCE.target)(144, 1.0);
        assert!((day.min - 0.5).abs() < 1e-12);
        assert_eq!((ZOMBIE_BALANCE.target)(40, 0.0).min, 0.0);
        assert_eq!((COW_BALANCE.target)(29, 0.5), TargetBand { min: 0.0, max: 2.0 });
        assert_eq!((SKELETON_BALANCE.target)(6, 0.3), TargetBand { min: 1.0, max: 2.0 });
    }

    #[test]
    fn test_populations_converge_into_band() {
        let mut world = grass_world(small_config(), Cell::new(0, 0));
        world.set_daylight(0.0);
        for _ in 0..2_000 {
            balance_world(&mut world).unwrap();
        }
        let layout = *world.chunk_layout();
        for key in layout.keys() {
            let cows = world.store().count_in_chunk(key, Species::Cow);
            let zombies = world.store().count_in_chunk(key, Species::Zombie);
            assert!((1..=2).contains(&cows), "{key:?}: {cows} cows");
            assert!((3..=4).contains(&zombies), "{key:?}: {zombies} zombies");
            assert_eq!(world.store().count_in_chunk(key, Species::Skeleton), 0);
        }
    }

    #[test]
    fn test_crowded_chunk_is_thinned() {
        let mut world = grass_world(small_config(), Cell::new(23, 23));
        world.set_daylight(1.0);
        for x in 0..10 {
            world
                .spawn(Species::Zombie, Cell::new(x, 2), SpawnCause::Behavior)
                .unwrap();
        }
        for _ in 0..500 {
            balance_world(&mut world).unwrap();
        }
        let zombies = world.store().count_in_chunk(ChunkKey::new(0, 0), Species::Zombie);
        assert!(zombies <= 1, "{zombies} zombies left");
    }

    #[test]
    fn test_peaceful_never_spawns_hostiles() {
        let config = WorldConfig {
            peaceful_mode: true,
            ..small_config()
        };
        let mut world = grass_world(config, Cell::new(0, 0));
        world.set_daylight(0.0);
        for _ in 0..1_000 {
            balance_world(&mut world).unwrap();
            assert_eq!(world.count(Species::Zombie), 0);
            assert_eq!(world.count(Species::Skeleton), 0);
        }
        assert!(world.count(Species::Cow) > 0);
    }

    #[test]
    fn test_mobs_disabled_is_inert() {
        let config = WorldConfig {
            enable_mobs: false,
            ..small_config()
        };
        let mut world = grass_world(config, Cell::new(0, 0));
        let before: Vec<u64> = (0..4).map(|_| world.rng().gen()).collect();
        world.reset(31);
        let report = balance_world(&mut world).unwrap();
        assert_eq!(report, BalanceReport::default());
        let after: Vec<u64> = (0..4).map(|_| world.rng().gen()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_distance_guards() {
        let mut world = grass_world(small_config(), Cell::new(6, 6));
        world.set_daylight(1.0);
        // Cows within 5 of the player are never balanced away.
        let mut near = Vec::new();
        for x in 2..11 {
            near.push(
                world
                    .spawn(Species::Cow, Cell::new(x, 5), SpawnCause::Behavior)
                    .unwrap(),
            );
        }
        for _ in 0..500 {
            balance_world(&mut world).unwrap();
            for event in world.drain_events() {
                if event.is_spawn() && event.species == Species::Zombie {
                    assert!(event.cell.chebyshev(Cell::new(6, 6)) >= 6, "{}", event.cell);
                }
                if event.is_spawn() && event.species == Species::Cow {
                    assert!(event.cell.chebyshev(Cell::new(6, 6)) >= 5, "{}", event.cell);
                }
            }
        }
        for cow in near {
            assert!(world.store().contains(cow));
        }
    }
}
