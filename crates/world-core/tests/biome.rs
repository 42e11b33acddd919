//! Target biome tests

use world_core::config::{TargetBiome, WorldConfig};
use world_core::setup::generate_terrain;
use world_core::World;
use world_events::{Area, Material};

fn mountain_fraction(biome: TargetBiome, seed: u64) -> f64 {
    let config = WorldConfig {
        area: Area::new(64, 64),
        target_biome: biome,
        ..WorldConfig::default()
    };
    let mut world = World::new(config).unwrap();
    world.reset(seed);
    let start = world.area().center();
    generate_terrain(&mut world, start).unwrap();

    let grid = world.grid();
    let rock: usize = Material::all()
        .iter()
        .filter(|m| m.is_mountain())
        .map(|m| grid.count(*m))
        .sum();
    rock as f64 / world.area().cell_count() as f64
}

#[test]
fn test_mountain_biome_has_more_rock_than_grassland() {
    let seeds = 0..8;
    let mountain: f64 = seeds.clone().map(|s| mountain_fraction(TargetBiome::Mountain, s)).sum();
    let grassland: f64 = seeds.map(|s| mountain_fraction(TargetBiome::Grassland, s)).sum();
    assert!(mountain > grassland * 2.0, "mountain {mountain} vs grassland {grassland}");
}

#[test]
fn test_grassland_is_mostly_open() {
    for seed in 0..4 {
        let config = WorldConfig {
            target_biome: TargetBiome::Grassland,
            ..WorldConfig::default()
        };
        let mut world = World::new(config).unwrap();
        world.reset(seed);
        let start = world.area().center();
        generate_terrain(&mut world, start).unwrap();
        let grid = world.grid();
        let open = grid.count(Material::Grass) + grid.count(Material::Tree);
        assert!(open * 2 > world.area().cell_count(), "seed {seed}");
    }
}
