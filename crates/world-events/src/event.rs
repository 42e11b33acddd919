//! Event Types
//!
//! Population changes emitted by the world engine, one JSON object per line.

use serde::{Deserialize, Serialize};

use crate::{Cell, Species};

/// Why an entity entered the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnCause {
    /// The player placed at the start of an episode
    EpisodeStart,
    /// Second pass of world generation
    InitialPlacement,
    /// One-shot extra spawn list from the configuration
    ExtraSpawn,
    /// Population balancing raised a chunk towards its target band
    Balance,
    /// Created by an entity update hook
    Behavior,
}

/// Why an entity left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DespawnCause {
    /// Population balancing lowered a crowded chunk
    Balance,
    /// Removed by an entity update hook (death, arrow impact, ...)
    Behavior,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    Spawned { cause: SpawnCause },
    Despawned { cause: DespawnCause },
}

/// A single population change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    /// Position in the world's event sequence, monotonic across episodes
    pub id: u64,
    pub episode: u64,
    pub tick: u64,
    pub species: Species,
    pub cell: Cell,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl WorldEvent {
    pub fn is_spawn(&self) -> bool {
        matches!(self.kind, EventKind::Spawned { .. })
    }

    pub fn is_despawn(&self) -> bool {
        matches!(self.kind, EventKind::Despawned { .. })
    }

    /// One line of an event journal.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}
