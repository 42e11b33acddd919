//! World Snapshots
//!
//! Captures material coverage and population of a world as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use world_events::{EntitySnapshot, Species, WorldSnapshot};

use crate::world::World;

/// Optional snapshot sections
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotDetail {
    pub entities: bool,
    pub map: bool,
}

pub fn take_snapshot(world: &World, detail: SnapshotDetail) -> WorldSnapshot {
    let store = world.store();
    let mut population = BTreeMap::new();
    for &species in Species::all() {
        let count = store.count(species);
        if count > 0 {
            population.insert(species, count);
        }
    }

    let entities = if detail.entities {
        store
            .entities()
            .iter()
            .filter_map(|&entity| {
                let species = store.species_of(entity)?;
                let cell = store.cell_of(entity)?;
                let facing = store.facing_of(entity).unwrap_or_default();
                Some(EntitySnapshot {
                    species,
                    cell,
                    facing: (facing.dx, facing.dy),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    WorldSnapshot {
        seed: world.seed(),
        episode: world.episode(),
        tick: world.tick(),
        daylight: world.daylight(),
        area: world.area(),
        chunk_size: world.config().chunk_size,
        materials: world.grid().histogram(),
        population,
        entities,
        map: if detail.map { world.grid().rows() } else { Vec::new() },
    }
}

/// Writes a snapshot as pretty-printed JSON, creating parent directories.
pub fn write_snapshot(snapshot: &WorldSnapshot, path: impl AsRef<Path>) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, snapshot.to_json_pretty()?)
}
