//! Population balancing tests
//!
//! Long-running checks of the balancer's guarantees over whole episodes.

use world_core::config::{Config, WorldConfig};
use world_core::systems::balance::{balance_world, BALANCE_ORDER};
use world_core::{Episode, Idle, Wander, World};
use world_events::{Area, Cell, Material, SpawnCause, Species};

fn episode_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.episode.seed = Some(seed);
    config.episode.length = 600;
    config
}

#[test]
fn test_peaceful_episode_never_adds_hostiles() {
    for seed in [3, 17, 99] {
        let mut config = episode_config(seed);
        config.world.peaceful_mode = true;
        let mut episode = Episode::new(config).unwrap();
        episode.reset().unwrap();

        let mut wander = Wander::default();
        while !episode.done() {
            episode.step(&mut wander).unwrap();
            for event in episode.world_mut().drain_events() {
                assert!(
                    !(event.is_spawn() && event.species.is_hostile()),
                    "seed {seed}: {event:?}"
                );
            }
        }
        assert_eq!(episode.world().count(Species::Zombie), 0);
        assert_eq!(episode.world().count(Species::Skeleton), 0);
    }
}

#[test]
fn test_balancer_respects_protection_distances() {
    for seed in [1, 2, 3] {
        let mut episode = Episode::new(episode_config(seed)).unwrap();
        episode.reset().unwrap();
        episode.world_mut().drain_events();

        while !episode.done() {
            let outcome = episode.step(&mut Idle).unwrap();
            let player = episode.player_cell().unwrap();
            let events = episode.world_mut().drain_events();
            if outcome.balance.is_none() {
                assert!(events.is_empty());
                continue;
            }
            for event in events {
                let rule = BALANCE_ORDER
                    .iter()
                    .find(|r| r.species == event.species)
                    .unwrap();
                let distance = event.cell.chebyshev(player);
                if event.is_spawn() {
                    assert!(distance >= rule.spawn_distance, "{event:?}");
                } else {
                    assert!(distance >= rule.despawn_distance, "{event:?}");
                }
            }
        }
    }
}

/// One chunk of abundant grass, far from the player, flooded with cows.
#[test]
fn test_overpopulated_chunk_converges() {
    for seed in 0..5 {
        let config = WorldConfig {
            area: Area::new(36, 12),
            chunk_size: Area::new(12, 12),
            ..WorldConfig::default()
        };
        let mut world = World::new(config).unwrap();
        world.reset(seed);
        for index in 0..world.area().cell_count() {
            let cell = world.area().cell_at(index);
            world.set(cell, Material::Grass).unwrap();
        }
        world.spawn_player(Cell::new(35, 6)).unwrap();
        for x in 0..12 {
            for y in 0..4 {
                world
                    .spawn(Species::Cow, Cell::new(x, y), SpawnCause::Behavior)
                    .unwrap();
            }
        }

        for pass in 0..2_000 {
            let daylight = if pass % 2 == 0 { 0.2 } else { 0.9 };
            world.set_daylight(daylight);
            balance_world(&mut world).unwrap();
        }
        // 1.5 + daylight never exceeds 2.5, so the band ceiling is at most 3.
        let cows = world.store().count_in_chunk(world_core::ChunkKey::new(0, 0), Species::Cow);
        assert!(cows <= 3, "seed {seed}: {cows} cows");
        assert!(cows >= 1, "seed {seed}: {cows} cows");
    }
}
