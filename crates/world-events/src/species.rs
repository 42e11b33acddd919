//! Species Tags
//!
//! Every entity the world indexes carries exactly one species.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Player,
    Cow,
    Zombie,
    Skeleton,
    Plant,
    Arrow,
}

impl Species {
    /// Number of species, the length of per-species count tables.
    pub const COUNT: usize = 6;

    pub fn all() -> &'static [Species] {
        &[
            Species::Player,
            Species::Cow,
            Species::Zombie,
            Species::Skeleton,
            Species::Plant,
            Species::Arrow,
        ]
    }

    /// Species managed by generation and population balancing, in balancing order.
    pub fn mobs() -> &'static [Species] {
        &[Species::Cow, Species::Zombie, Species::Skeleton]
    }

    /// Dense index into per-species tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Hostile species are suppressed entirely in peaceful mode.
    pub fn is_hostile(self) -> bool {
        matches!(self, Species::Zombie | Species::Skeleton | Species::Arrow)
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Player => "player",
            Species::Cow => "cow",
            Species::Zombie => "zombie",
            Species::Skeleton => "skeleton",
            Species::Plant => "plant",
            Species::Arrow => "arrow",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSpeciesError(pub String);

impl fmt::Display for ParseSpeciesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown species: {}", self.0)
    }
}

impl std::error::Error for ParseSpeciesError {}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::all()
            .iter()
            .copied()
            .find(|sp| sp.name() == s)
            .ok_or_else(|| ParseSpeciesError(s.to_string()))
    }
}
