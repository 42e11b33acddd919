//! Shared vocabulary and event types for the survival world engine.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod geometry;
pub mod material;
pub mod snapshot;
pub mod species;

pub use event::{DespawnCause, EventKind, SpawnCause, WorldEvent};
pub use geometry::{Area, Cell};
pub use material::{Material, ParseMaterialError};
pub use snapshot::{EntitySnapshot, WorldSnapshot};
pub use species::{ParseSpeciesError, Species};
