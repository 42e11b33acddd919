//! Configuration System
//!
//! Loads world-generation and episode parameters from a TOML file. Every option
//! is enumerated here and range-checked once, when a world or episode is built.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use world_events::{Area, Species};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "world.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub world: WorldConfig,
    pub episode: EpisodeConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.episode.validate()
    }
}

/// Biome the terrain synthesizer is biased towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBiome {
    /// Natural terrain without rescaling
    #[default]
    #[serde(alias = "natural")]
    None,
    Mountain,
    Beaches,
    Grassland,
}

impl FromStr for TargetBiome {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "natural" => Ok(TargetBiome::None),
            "mountain" => Ok(TargetBiome::Mountain),
            "beaches" => Ok(TargetBiome::Beaches),
            "grassland" => Ok(TargetBiome::Grassland),
            other => Err(ConfigError::UnknownBiome(other.to_string())),
        }
    }
}

/// Resources whose spawn threshold can be set through a rarity preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deposit {
    Coal,
    Iron,
    Diamond,
    Tree,
}

/// Named rarity preset. `Default` keeps the explicit threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Default,
    Rare,
    Common,
    #[serde(alias = "very common")]
    VeryCommon,
}

impl Rarity {
    /// Threshold a uniform draw must exceed, or `None` for `Default`.
    pub fn threshold(self, deposit: Deposit) -> Option<f64> {
        let (rare, common, very_common) = match deposit {
            Deposit::Coal => (0.95, 0.85, 0.75),
            Deposit::Iron => (0.85, 0.75, 0.65),
            Deposit::Diamond => (0.994, 0.9, 0.85),
            Deposit::Tree => (0.9, 0.8, 0.7),
        };
        match self {
            Rarity::Default => None,
            Rarity::Rare => Some(rare),
            Rarity::Common => Some(common),
            Rarity::VeryCommon => Some(very_common),
        }
    }
}

/// One entry of the one-shot extra spawn list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSpawn {
    pub species: Species,
    pub count: usize,
}

/// Open distance interval `(min, max)` from the player start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBand {
    pub min: f64,
    pub max: f64,
}

impl SpawnBand {
    pub fn contains(&self, distance: f64) -> bool {
        distance > self.min && distance < self.max
    }
}

/// World generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    pub area: Area,
    pub chunk_size: Area,

    pub enable_mobs: bool,
    pub enable_trees: bool,
    pub enable_lava: bool,
    pub enable_water: bool,
    pub enable_sand: bool,
    pub enable_path: bool,
    pub enable_diamond: bool,
    pub enable_coal: bool,
    pub enable_iron: bool,
    pub enable_mountain: bool,
    pub peaceful_mode: bool,
    pub target_biome: TargetBiome,

    pub cow_spawn_thres: f64,
    pub zombie_spawn_thres: f64,
    pub skeleton_spawn_thres: f64,
    pub coal_spawn_thres: f64,
    pub iron_spawn_thres: f64,
    pub diamond_spawn_thres: f64,
    pub tree_spawn_thres: f64,

    pub coal_rarity: Rarity,
    pub iron_rarity: Rarity,
    pub diamond_rarity: Rarity,
    pub tree_rarity: Rarity,

    pub max_num_cows: usize,
    pub max_num_zombies: usize,
    pub max_num_skeletons: usize,

    pub min_cow_spawn_dist: f64,
    pub max_cow_spawn_dist: f64,
    pub min_zombie_spawn_dist: f64,
    pub max_zombie_spawn_dist: f64,
    pub min_skeleton_spawn_dist: f64,
    pub max_skeleton_spawn_dist: f64,

    pub extra_spawns: Vec<ExtraSpawn>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            area: Area::new(64, 64),
            chunk_size: Area::new(12, 12),
            enable_mobs: true,
            enable_trees: true,
            enable_lava: true,
            enable_water: true,
            enable_sand: true,
            enable_path: true,
            enable_diamond: true,
            enable_coal: true,
            enable_iron: true,
            enable_mountain: true,
            peaceful_mode: false,
            target_biome: TargetBiome::None,
            cow_spawn_thres: 0.985,
            zombie_spawn_thres: 0.993,
            skeleton_spawn_thres: 0.95,
            coal_spawn_thres: 0.85,
            iron_spawn_thres: 0.75,
            diamond_spawn_thres: 0.994,
            tree_spawn_thres: 0.8,
            coal_rarity: Rarity::Default,
            iron_rarity: Rarity::Default,
            diamond_rarity: Rarity::Default,
            tree_rarity: Rarity::Default,
            max_num_cows: 10_000,
            max_num_zombies: 10_000,
            max_num_skeletons: 10_000,
            min_cow_spawn_dist: 3.0,
            max_cow_spawn_dist: 10_000.0,
            min_zombie_spawn_dist: 10.0,
            max_zombie_spawn_dist: 10_000.0,
            min_skeleton_spawn_dist: 0.0,
            max_skeleton_spawn_dist: 10_000.0,
            extra_spawns: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Check every option once. Called by `World::new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.area.width <= 0 || self.area.height <= 0 {
            return Err(ConfigError::InvalidArea(self.area));
        }
        if self.chunk_size.width <= 0 || self.chunk_size.height <= 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunk_size));
        }

        let thresholds = [
            ("cow_spawn_thres", self.cow_spawn_thres),
            ("zombie_spawn_thres", self.zombie_spawn_thres),
            ("skeleton_spawn_thres", self.skeleton_spawn_thres),
            ("coal_spawn_thres", self.coal_spawn_thres),
            ("iron_spawn_thres", self.iron_spawn_thres),
            ("diamond_spawn_thres", self.diamond_spawn_thres),
            ("tree_spawn_thres", self.tree_spawn_thres),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        let distances = [
            ("min_cow_spawn_dist", self.min_cow_spawn_dist),
            ("max_cow_spawn_dist", self.max_cow_spawn_dist),
            ("min_zombie_spawn_dist", self.min_zombie_spawn_dist),
            ("max_zombie_spawn_dist", self.max_zombie_spawn_dist),
            ("min_skeleton_spawn_dist", self.min_skeleton_spawn_dist),
            ("max_skeleton_spawn_dist", self.max_skeleton_spawn_dist),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { name, value });
            }
        }
        for &species in Species::mobs() {
            let band = self.configured_band(species);
            if band.min > band.max {
                return Err(ConfigError::EmptySpawnBand {
                    species,
                    min: band.min,
                    max: band.max,
                });
            }
        }

        for extra in &self.extra_spawns {
            if !Species::mobs().contains(&extra.species) {
                return Err(ConfigError::UnsupportedExtraSpawn(extra.species));
            }
            if self.peaceful_mode && extra.species.is_hostile() {
                return Err(ConfigError::HostileExtraSpawn(extra.species));
            }
        }
        Ok(())
    }

    /// Whether zombies and skeletons may be generated or balanced.
    pub fn hostiles_enabled(&self) -> bool {
        self.enable_mobs && !self.peaceful_mode
    }

    /// Spawn threshold for a deposit, with the rarity preset applied.
    pub fn deposit_threshold(&self, deposit: Deposit) -> f64 {
        let (rarity, explicit) = match deposit {
            Deposit::Coal => (self.coal_rarity, self.coal_spawn_thres),
            Deposit::Iron => (self.iron_rarity, self.iron_spawn_thres),
            Deposit::Diamond => (self.diamond_rarity, self.diamond_spawn_thres),
            Deposit::Tree => (self.tree_rarity, self.tree_spawn_thres),
        };
        rarity.threshold(deposit).unwrap_or(explicit)
    }

    /// Uniform draw threshold for initial placement of a mob species.
    pub fn spawn_threshold(&self, species: Species) -> f64 {
        match species {
            Species::Cow => self.cow_spawn_thres,
            Species::Zombie => self.zombie_spawn_thres,
            Species::Skeleton => self.skeleton_spawn_thres,
            _ => 1.0,
        }
    }

    /// Global cap on initially placed instances of a mob species.
    pub fn max_population(&self, species: Species) -> usize {
        match species {
            Species::Cow => self.max_num_cows,
            Species::Zombie => self.max_num_zombies,
            Species::Skeleton => self.max_num_skeletons,
            _ => 0,
        }
    }

    /// Distance band exactly as configured.
    pub fn configured_band(&self, species: Species) -> SpawnBand {
        match species {
            Species::Cow => SpawnBand {
                min: self.min_cow_spawn_dist,
                max: self.max_cow_spawn_dist,
            },
            Species::Zombie => SpawnBand {
                min: self.min_zombie_spawn_dist,
                max: self.max_zombie_spawn_dist,
            },
            Species::Skeleton => SpawnBand {
                min: self.min_skeleton_spawn_dist,
                max: self.max_skeleton_spawn_dist,
            },
            _ => SpawnBand { min: 0.0, max: 0.0 },
        }
    }
}

/// Episode driver parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpisodeConfig {
    /// Base seed; drawn from the OS generator when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Steps before the episode is over, 0 for unbounded
    pub length: u64,
    /// Chebyshev radius around the player inside which entities are updated
    pub update_radius: i32,
    /// Steps between population balancing passes
    pub balance_interval: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            length: 10_000,
            update_radius: 18,
            balance_interval: 10,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.update_radius <= 0 {
            return Err(ConfigError::NonPositive {
                name: "update_radius",
            });
        }
        if self.balance_interval == 0 {
            return Err(ConfigError::NonPositive {
                name: "balance_interval",
            });
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("area must be positive in both dimensions, got {0}")]
    InvalidArea(Area),
    #[error("chunk size must be positive in both dimensions, got {0}")]
    InvalidChunkSize(Area),
    #[error("{name} must lie within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
    #[error("{name} must be a finite non-negative distance, got {value}")]
    InvalidDistance { name: &'static str, value: f64 },
    #[error("{species} spawn distance band is empty (min {min} > max {max})")]
    EmptySpawnBand { species: Species, min: f64, max: f64 },
    #[error("unknown target biome `{0}` (expected none, natural, mountain, beaches or grassland)")]
    UnknownBiome(String),
    #[error("extra spawns must name a mob species, got {0}")]
    UnsupportedExtraSpawn(Species),
    #[error("peaceful mode forbids extra {0} spawns")]
    HostileExtraSpawn(Species),
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },
}
