//! Snapshot Types
//!
//! Serialization structs capturing a world at a point in time, used for
//! analysis and debugging of generated episodes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Area, Cell, Material, Species};

/// A live entity as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub species: Species,
    pub cell: Cell,
    pub facing: (i32, i32),
}

/// Full world snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub seed: u64,
    pub episode: u64,
    pub tick: u64,
    pub daylight: f64,
    pub area: Area,
    pub chunk_size: Area,
    /// Cell count per material
    pub materials: BTreeMap<Material, usize>,
    /// Live entity count per species
    pub population: BTreeMap<Species, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<EntitySnapshot>,
    /// Text map, one string per row, see [`Material::glyph`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub map: Vec<String>,
}

impl WorldSnapshot {
    /// Fraction of the area covered by the given material.
    pub fn material_fraction(&self, material: Material) -> f64 {
        let total = self.area.cell_count();
        if total == 0 {
            return 0.0;
        }
        self.materials.get(&material).copied().unwrap_or(0) as f64 / total as f64
    }

    pub fn population_of(&self, species: Species) -> usize {
        self.population.get(&species).copied().unwrap_or(0)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_fraction() {
        let mut materials = BTreeMap::new();
        materials.insert(Material::Grass, 12);
        materials.insert(Material::Stone, 4);
        let snapshot = WorldSnapshot {
            seed: 1,
            episode: 1,
            tick: 0,
            daylight: 0.5,
            area: Area::new(4, 4),
            chunk_size: Area::new(2, 2),
            materials,
            population: BTreeMap::new(),
            entities: Vec::new(),
            map: Vec::new(),
        };
        assert_eq!(snapshot.material_fraction(Material::Grass), 0.75);
        assert_eq!(snapshot.material_fraction(Material::Water), 0.0);
        assert_eq!(snapshot.population_of(Species::Cow), 0);

        let json = snapshot.to_json_pretty().unwrap();
        assert!(json.contains("\"grass\": 12"));
        assert!(!json.contains("\"map\""));
    }
}
