//! Initial Placement
//!
//! Second generation pass. Walks every walkable cell and lets the first
//! matching spawn rule place one mob there.

use bevy_ecs::entity::Entity;
use rand::Rng;
use tracing::info;
use world_events::{Cell, Material, SpawnCause, Species};

use super::rules::{Rule, RuleChain};
use super::terrain::TunnelMask;
use super::TerrainError;
use crate::config::{SpawnBand, WorldConfig};
use crate::world::World;

/// Hostiles are never placed closer than this to the player start.
pub const HOSTILE_MIN_DISTANCE: f64 = 10.0;

/// A mob created by the placement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub species: Species,
    pub cell: Cell,
    pub entity: Entity,
}

/// Distance band used for initial placement, with the hostile floor applied.
pub fn placement_band(config: &WorldConfig, species: Species) -> SpawnBand {
    let band = config.configured_band(species);
    if species.is_hostile() {
        SpawnBand {
            min: band.min.max(HOSTILE_MIN_DISTANCE),
            max: band.max,
        }
    } else {
        band
    }
}

struct Site<'w> {
    cell: Cell,
    material: Material,
    distance: f64,
    tunnel: bool,
    world: &'w mut World,
}

impl Site<'_> {
    fn in_band(&self, species: Species) -> bool {
        placement_band(self.world.config(), species).contains(self.distance)
    }

    fn draw_exceeds(&mut self, species: Species) -> bool {
        let threshold = self.world.config().spawn_threshold(species);
        self.world.rng().gen::<f64>() > threshold
    }

    fn below_cap(&self, species: Species) -> bool {
        self.world.count(species) < self.world.config().max_population(species)
    }
}

type PlacementRule<'w> = Rule<Site<'w>, Option<Species>, TerrainError>;

fn placement_chain<'w>(config: &WorldConfig) -> RuleChain<Site<'w>, Option<Species>, TerrainError> {
    let hostiles = config.hostiles_enabled();
    RuleChain::new(None)
        .rule(PlacementRule::new("cow", Some(Species::Cow), |site| {
            Ok(site.in_band(Species::Cow)
                && site.material == Material::Grass
                && site.draw_exceeds(Species::Cow)
                && site.below_cap(Species::Cow))
        }))
        .rule(
            PlacementRule::new("zombie", Some(Species::Zombie), |site| {
                Ok(site.in_band(Species::Zombie)
                    && site.draw_exceeds(Species::Zombie)
                    && site.below_cap(Species::Zombie))
            })
            .enabled_if(hostiles),
        )
        .rule(
            PlacementRule::new("skeleton", Some(Species::Skeleton), |site| {
                Ok(site.in_band(Species::Skeleton)
                    && site.material == Material::Path
                    && site.tunnel
                    && site.draw_exceeds(Species::Skeleton)
                    && site.below_cap(Species::Skeleton))
            })
            .enabled_if(hostiles),
        )
}

/// Seeds mobs over the generated terrain around `start`. Returns the created
/// mobs in creation order; empty when mobs are disabled.
pub fn place_objects(
    world: &mut World,
    start: Cell,
    tunnels: &TunnelMask,
) -> Result<Vec<Placement>, TerrainError> {
    let mut placements = Vec::new();
    if !world.config().enable_mobs {
        return Ok(placements);
    }

    let area = world.area();
    let chain = placement_chain(world.config());
    let mut site = Site {
        cell: start,
        material: Material::Void,
        distance: 0.0,
        tunnel: false,
        world,
    };

    for x in 0..area.width {
        for y in 0..area.height {
            let cell = Cell::new(x, y);
            let material = site.world.get(cell);
            if !material.is_walkable() {
                continue;
            }
            site.cell = cell;
            site.material = material;
            site.distance = cell.euclidean(start);
            site.tunnel = tunnels.get(cell);

            let Some(species) = *chain.evaluate(&mut site)? else {
                continue;
            };
            // The player's own cell is the only walkable cell that can be taken.
            if !site.world.store().is_free(cell) {
                continue;
            }
            let entity = site
                .world
                .spawn(species, cell, SpawnCause::InitialPlacement)
                .map_err(TerrainError::Placement)?;
            placements.push(Placement {
                species,
                cell,
                entity,
            });
        }
    }

    info!(
        cows = site.world.count(Species::Cow),
        zombies = site.world.count(Species::Zombie),
        skeletons = site.world.count(Species::Skeleton),
        "initial mobs placed"
    );
    Ok(placements)
}
