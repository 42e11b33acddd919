//! ECS Components
//!
//! Components attached to world entities: spatial identity plus the
//! species-specific runtime state that behaviour collaborators update.

pub mod entity;
pub mod mobs;

pub use entity::*;
pub use mobs::*;
