//! Material Types
//!
//! The closed set of cell materials a world grid can hold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Material of a single grid cell.
///
/// `Void` is the sentinel returned for reads outside the world area and the
/// value of cells that have not been generated yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Material {
    Void = 0,
    Water = 1,
    Grass = 2,
    Stone = 3,
    Path = 4,
    Sand = 5,
    Tree = 6,
    Lava = 7,
    Coal = 8,
    Iron = 9,
    Diamond = 10,
    Table = 11,
    Furnace = 12,
}

impl Material {
    /// Returns all material variants, sentinel included.
    pub fn all() -> &'static [Material] {
        &[
            Material::Void,
            Material::Water,
            Material::Grass,
            Material::Stone,
            Material::Path,
            Material::Sand,
            Material::Tree,
            Material::Lava,
            Material::Coal,
            Material::Iron,
            Material::Diamond,
            Material::Table,
            Material::Furnace,
        ]
    }

    /// Stable byte code, used for byte-exact grid comparisons.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Materials mobs and the player can stand on.
    pub fn is_walkable(self) -> bool {
        matches!(self, Material::Grass | Material::Sand | Material::Path)
    }

    /// Materials produced by the mountain branch of terrain generation.
    pub fn is_mountain(self) -> bool {
        matches!(
            self,
            Material::Stone
                | Material::Path
                | Material::Coal
                | Material::Iron
                | Material::Diamond
                | Material::Lava
        )
    }

    /// Single character used by the text map.
    pub fn glyph(self) -> char {
        match self {
            Material::Void => ' ',
            Material::Water => '~',
            Material::Grass => '.',
            Material::Stone => '#',
            Material::Path => '_',
            Material::Sand => ':',
            Material::Tree => 'T',
            Material::Lava => '%',
            Material::Coal => 'c',
            Material::Iron => 'i',
            Material::Diamond => 'd',
            Material::Table => 't',
            Material::Furnace => 'f',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Void => "void",
            Material::Water => "water",
            Material::Grass => "grass",
            Material::Stone => "stone",
            Material::Path => "path",
            Material::Sand => "sand",
            Material::Tree => "tree",
            Material::Lava => "lava",
            Material::Coal => "coal",
            Material::Iron => "iron",
            Material::Diamond => "diamond",
            Material::Table => "table",
            Material::Furnace => "furnace",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a material name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMaterialError(pub String);

impl fmt::Display for ParseMaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown material: {}", self.0)
    }
}

impl std::error::Error for ParseMaterialError {}

impl FromStr for Material {
    type Err = ParseMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Material::all()
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| ParseMaterialError(s.to_string()))
    }
}
