//! Terrain Synthesis
//!
//! First generation pass. Three noise fields (start, water, mountain) are
//! sampled per cell, rescaled for the target biome and resolved to a material
//! by an ordered rule chain. The grid is built off to the side and committed
//! only once every cell succeeded.

use rand::Rng;
use tracing::info;
use world_events::{Area, Cell, Material};

use super::noise::{octave, Layers, NoiseField, Octave};
use super::rules::{Rule, RuleChain};
use super::TerrainError;
use crate::config::{Deposit, TargetBiome, WorldConfig};
use crate::world::{MaterialGrid, World, WorldRng};

const WATER_OCTAVES: [Octave; 2] = [octave(15.0, 1.0), octave(5.0, 0.15)];
const MOUNTAIN_OCTAVES: [Octave; 2] = [octave(15.0, 1.0), octave(5.0, 0.3)];

/// Cells carved by horizontal or vertical tunnels. Skeletons only appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelMask {
    area: Area,
    bits: Vec<bool>,
}

impl TunnelMask {
    pub fn new(area: Area) -> Self {
        Self {
            area,
            bits: vec![false; area.cell_count()],
        }
    }

    pub fn get(&self, cell: Cell) -> bool {
        self.area.index(cell).map(|i| self.bits[i]).unwrap_or(false)
    }

    fn mark(&mut self, cell: Cell) {
        if let Some(i) = self.area.index(cell) {
            self.bits[i] = true;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// Field rescaling and plateau parameters for a target biome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiomeProfile {
    pub plateau_threshold: f64,
    pub plateau_material: Material,
    biome: TargetBiome,
}

impl BiomeProfile {
    pub fn for_biome(biome: TargetBiome) -> Self {
        let (plateau_threshold, plateau_material) = match biome {
            TargetBiome::None => (0.5, Material::Grass),
            TargetBiome::Mountain => (0.6, Material::Path),
            TargetBiome::Beaches => (0.8, Material::Grass),
            TargetBiome::Grassland => (0.6, Material::Grass),
        };
        Self {
            plateau_threshold,
            plateau_material,
            biome,
        }
    }

    /// Rescales `(water, mountain)` in place.
    fn rescale(&self, water: &mut f64, mountain: &mut f64) {
        match self.biome {
            TargetBiome::None => {}
            TargetBiome::Mountain => {
                *mountain = mountain.abs() * 2.0;
                *water *= 0.1;
            }
            TargetBiome::Beaches => {
                *mountain *= 0.1;
            }
            TargetBiome::Grassland => {
                *water *= 0.1;
                *mountain *= 0.1;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Plateau,
    Mountain,
    Tunnel,
    Place(Material),
}

/// Deposit thresholds resolved once per pass.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    coal: f64,
    iron: f64,
    diamond: f64,
    tree: f64,
    plateau: f64,
}

/// Evaluation context reused for every cell of the pass.
struct CellSample<'a> {
    x: f64,
    y: f64,
    start: f64,
    water: f64,
    mountain: f64,
    noise: &'a NoiseField,
    rng: &'a mut WorldRng,
    thresholds: Thresholds,
}

impl CellSample<'_> {
    fn noise(&self, x: f64, y: f64, z: f64, size: f64) -> Result<f64, TerrainError> {
        self.noise.single(x, y, z, size)
    }

    fn draw_exceeds(&mut self, threshold: f64) -> bool {
        self.rng.gen::<f64>() > threshold
    }
}

type TerrainChain<'a> = RuleChain<CellSample<'a>, Outcome, TerrainError>;
type TerrainRule<'a> = Rule<CellSample<'a>, Outcome, TerrainError>;

fn surface_chain<'a>(config: &WorldConfig) -> TerrainChain<'a> {
    RuleChain::new(Outcome::Place(Material::Grass))
        .rule(TerrainRule::new("plateau", Outcome::Plateau, |s| {
            Ok(s.start > s.thresholds.plateau)
        }))
        .rule(
            TerrainRule::new("mountain", Outcome::Mountain, |s| Ok(s.mountain > 0.15))
                .enabled_if(config.enable_mountain),
        )
        .rule(
            TerrainRule::new("sand", Outcome::Place(Material::Sand), |s| {
                Ok(s.water > 0.25 && s.water <= 0.35 && s.noise(s.x, s.y, 4.0, 9.0)? > -0.2)
            })
            .enabled_if(config.enable_sand),
        )
        .rule(
            TerrainRule::new("water", Outcome::Place(Material::Water), |s| Ok(s.water > 0.3))
                .enabled_if(config.enable_water),
        )
        .rule(
            TerrainRule::new("tree", Outcome::Place(Material::Tree), |s| {
                if s.noise(s.x, s.y, 5.0, 7.0)? <= 0.0 {
                    return Ok(false);
                }
                let threshold = s.thresholds.tree;
                Ok(s.draw_exceeds(threshold))
            })
            .enabled_if(config.enable_trees),
        )
}

fn mountain_chain<'a>(config: &WorldConfig) -> TerrainChain<'a> {
    RuleChain::new(Outcome::Place(Material::Stone))
        .rule(
            TerrainRule::new("cave", Outcome::Place(Material::Path), |s| {
                Ok(s.noise(s.x, s.y, 6.0, 7.0)? > 0.15 && s.mountain > 0.3)
            })
            .enabled_if(config.enable_path),
        )
        .rule(
            TerrainRule::new("horizontal_tunnel", Outcome::Tunnel, |s| {
                Ok(s.noise(2.0 * s.x, s.y / 5.0, 7.0, 3.0)? > 0.4)
            })
            .enabled_if(config.enable_path),
        )
        .rule(
            TerrainRule::new("vertical_tunnel", Outcome::Tunnel, |s| {
                Ok(s.noise(s.x / 5.0, 2.0 * s.y, 7.0, 3.0)? > 0.4)
            })
            .enabled_if(config.enable_path),
        )
        .rule(
            TerrainRule::new("coal", Outcome::Place(Material::Coal), |s| {
                let threshold = s.thresholds.coal;
                Ok(s.mountain > 0.18 && s.draw_exceeds(threshold))
            })
            .enabled_if(config.enable_coal),
        )
        .rule(
            TerrainRule::new("iron", Outcome::Place(Material::Iron), |s| {
                let threshold = s.thresholds.iron;
                Ok(s.mountain > 0.18 && s.draw_exceeds(threshold))
            })
            .enabled_if(config.enable_iron),
        )
        .rule(
            TerrainRule::new("diamond", Outcome::Place(Material::Diamond), |s| {
                let threshold = s.thresholds.diamond;
                Ok(s.mountain > 0.18 && s.draw_exceeds(threshold))
            })
            .enabled_if(config.enable_diamond),
        )
        .rule(
            TerrainRule::new("lava", Outcome::Place(Material::Lava), |s| {
                Ok(s.mountain > 0.3 && s.noise(s.x, s.y, 6.0, 5.0)? > 0.35)
            })
            .enabled_if(config.enable_lava),
        )
}

/// Runs the material pass around the player start `start` and commits the
/// result to the world grid. Draws the noise seed as the first value from the
/// world generator.
pub fn generate_terrain(world: &mut World, start: Cell) -> Result<TunnelMask, TerrainError> {
    let config = world.config().clone();
    let area = config.area;
    let profile = BiomeProfile::for_biome(config.target_biome);
    let thresholds = Thresholds {
        coal: config.deposit_threshold(Deposit::Coal),
        iron: config.deposit_threshold(Deposit::Iron),
        diamond: config.deposit_threshold(Deposit::Diamond),
        tree: config.deposit_threshold(Deposit::Tree),
        plateau: profile.plateau_threshold,
    };

    let noise_seed = world.rng().gen_range(0..(1u32 << 31) - 1);
    let noise = NoiseField::new(noise_seed);
    let (scratch, tunnels) = {
        let surface = surface_chain(&config);
        let mountain = mountain_chain(&config);
        let mut scratch = MaterialGrid::new(area, Material::Void);
        let mut tunnels = TunnelMask::new(area);
        let mut sample = CellSample {
            x: 0.0,
            y: 0.0,
            start: 0.0,
            water: 0.0,
            mountain: 0.0,
            noise: &noise,
            rng: world.rng(),
            thresholds,
        };

        for x in 0..area.width {
            for y in 0..area.height {
                let cell = Cell::new(x, y);
                sample_fields(&mut sample, cell, start, &profile)?;

                let mut outcome = *surface.evaluate(&mut sample)?;
                if outcome == Outcome::Mountain {
                    outcome = *mountain.evaluate(&mut sample)?;
                }
                let material = match outcome {
                    Outcome::Plateau => profile.plateau_material,
                    Outcome::Tunnel => {
                        tunnels.mark(cell);
                        Material::Path
                    }
                    Outcome::Place(material) => material,
                    Outcome::Mountain => Material::Stone,
                };
                scratch.set(cell, material)?;
            }
        }
        (scratch, tunnels)
    };

    info!(
        seed = noise_seed,
        biome = ?config.target_biome,
        water = scratch.count(Material::Water),
        stone = scratch.count(Material::Stone),
        trees = scratch.count(Material::Tree),
        tunnels = tunnels.count(),
        "terrain generated"
    );
    world.commit_grid(scratch);
    Ok(tunnels)
}

fn sample_fields(
    sample: &mut CellSample<'_>,
    cell: Cell,
    start: Cell,
    profile: &BiomeProfile,
) -> Result<(), TerrainError> {
    let x = f64::from(cell.x);
    let y = f64::from(cell.y);
    let noise = sample.noise;

    let closeness = 4.0 - cell.euclidean(start) + 2.0 * noise.single(x, y, 8.0, 3.0)?;
    let start_field = 1.0 / (1.0 + (-closeness).exp());
    let mut water = noise.sample(x, y, 3.0, Layers::raw(&WATER_OCTAVES))? + 0.1 - 2.0 * start_field;
    let mut mountain = noise.sample(x, y, 0.0, Layers::normalized(&MOUNTAIN_OCTAVES))?
        - (4.0 * start_field + 0.3 * water);
    profile.rescale(&mut water, &mut mountain);

    sample.x = x;
    sample.y = y;
    sample.start = start_field;
    sample.water = water;
    sample.mountain = mountain;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with(config: WorldConfig, seed: u64) -> World {
        let mut world = World::new(config).unwrap();
        world.reset(seed);
        world
    }

    #[test]
    fn test_every_cell_generated() {
        let mut world = world_with(WorldConfig::default(), 42);
        let center = world.area().center();
        generate_terrain(&mut world, center).unwrap();
        assert_eq!(world.grid().count(Material::Void), 0);
    }

    #[test]
    fn test_start_area_is_open() {
        let mut world = world_with(WorldConfig::default(), 3);
        let center = world.area().center();
        generate_terrain(&mut world, center).unwrap();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let material = world.get(center.offset(dx, dy));
                assert!(material.is_walkable() || material == Material::Tree, "{material}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let mut a = world_with(WorldConfig::default(), 11);
        let mut b = world_with(WorldConfig::default(), 11);
        let ta = generate_terrain(&mut a, Cell::new(32, 32)).unwrap();
        let tb = generate_terrain(&mut b, Cell::new(32, 32)).unwrap();
        assert_eq!(a.grid().to_bytes(), b.grid().to_bytes());
        assert_eq!(ta, tb);
    }

    #[test]
    fn test_disabled_materials_never_appear() {
        let config = WorldConfig {
            enable_water: false,
            enable_lava: false,
            enable_diamond: false,
            enable_trees: false,
            ..WorldConfig::default()
        };
        for seed in 0..4 {
            let mut world = world_with(config.clone(), seed);
            generate_terrain(&mut world, Cell::new(32, 32)).unwrap();
            for material in [Material::Water, Material::Lava, Material::Diamond, Material::Tree] {
                assert_eq!(world.grid().count(material), 0, "{material} with seed {seed}");
            }
        }
    }

    #[test]
    fn test_without_mountains_no_rock() {
        let config = WorldConfig {
            enable_mountain: false,
            ..WorldConfig::default()
        };
        let mut world = world_with(config, 8);
        let tunnels = generate_terrain(&mut world, Cell::new(32, 32)).unwrap();
        for material in Material::all().iter().filter(|m| m.is_mountain()) {
            assert_eq!(world.grid().count(*material), 0, "{material}");
        }
        assert_eq!(tunnels.count(), 0);
    }

    #[test]
    fn test_tunnels_are_path() {
        let mut world = world_with(WorldConfig::default(), 5);
        let tunnels = generate_terrain(&mut world, Cell::new(32, 32)).unwrap();
        for index in 0..world.area().cell_count() {
            let cell = world.area().cell_at(index);
            if tunnels.get(cell) {
                assert_eq!(world.get(cell), Material::Path);
            }
        }
    }

    #[test]
    fn test_mountain_plateau_is_path() {
        let config = WorldConfig {
            target_biome: TargetBiome::Mountain,
            ..WorldConfig::default()
        };
        let mut world = world_with(config, 21);
        generate_terrain(&mut world, Cell::new(32, 32)).unwrap();
        assert_eq!(world.get(Cell::new(32, 32)), Material::Path);
    }

    #[test]
    fn test_biome_profiles() {
        let profile = BiomeProfile::for_biome(TargetBiome::Beaches);
        assert_eq!(profile.plateau_threshold, 0.8);
        let (mut water, mut mountain) = (0.5, -0.4);
        BiomeProfile::for_biome(TargetBiome::Mountain).rescale(&mut water, &mut mountain);
        assert!((water - 0.05).abs() < 1e-12);
        assert!((mountain - 0.8).abs() < 1e-12);
    }
}
