//! Extra Spawns
//!
//! One-shot mobs requested by the configuration, dropped near the player
//! after the regular placement pass.

use rand::Rng;
use tracing::{debug, warn};
use world_events::{Cell, SpawnCause};

use super::objects::Placement;
use super::TerrainError;
use crate::world::World;

/// Samples drawn per requested mob before it is given up.
pub const MAX_SITE_SAMPLES: usize = 100;
/// Half-width of the sampling window around the player.
pub const WINDOW_X: i32 = 5;
/// Half-height of the sampling window around the player.
pub const WINDOW_Y: i32 = 4;
/// Minimum straight-line distance from the player.
pub const MIN_PLAYER_DISTANCE: f64 = 3.0;

/// Places every configured extra spawn around `player`. Mobs without a
/// suitable cell after [`MAX_SITE_SAMPLES`] draws are skipped.
pub fn spawn_extra(world: &mut World, player: Cell) -> Result<Vec<Placement>, TerrainError> {
    let requests = world.config().extra_spawns.clone();
    let mut placed = Vec::new();

    for request in requests {
        for _ in 0..request.count {
            let Some(cell) = find_site(world, player) else {
                warn!(
                    species = %request.species,
                    samples = MAX_SITE_SAMPLES,
                    "no free cell near the player, extra spawn skipped"
                );
                continue;
            };
            let entity = world
                .spawn(request.species, cell, SpawnCause::ExtraSpawn)
                .map_err(TerrainError::Placement)?;
            debug!(species = %request.species, %cell, "extra spawn placed");
            placed.push(Placement {
                species: request.species,
                cell,
                entity,
            });
        }
    }
    Ok(placed)
}

fn find_site(world: &mut World, player: Cell) -> Option<Cell> {
    for _ in 0..MAX_SITE_SAMPLES {
        let rng = world.rng();
        let x = rng.gen_range(player.x - WINDOW_X..player.x + WINDOW_X);
        let y = rng.gen_range(player.y - WINDOW_Y..player.y + WINDOW_Y);
        let cell = Cell::new(x, y);
        if world.get(cell).is_walkable()
            && world.store().is_free(cell)
            && cell.euclidean(player) >= MIN_PLAYER_DISTANCE
        {
            return Some(cell);
        }
    }
    None
}
