//! Simulation Systems
//!
//! Per-step world maintenance: the daylight clock, entity updates near the
//! player and periodic population balancing.

pub mod balance;
pub mod daylight;
pub mod step;

pub use balance::{balance_world, BalanceReport, SpeciesBalance, TargetBand, BALANCE_ORDER};
pub use daylight::{daylight_at, update_daylight, DAY_LENGTH};
pub use step::{update_entities, walkable_for, EntityUpdater, Idle, Wander};
