//! Day/Night Cycle

use std::f64::consts::PI;

use crate::world::World;

/// Steps in one full day.
pub const DAY_LENGTH: u64 = 300;

/// Daylight in `[0, 1]` after `step` steps. Episodes start in the morning.
pub fn daylight_at(step: u64) -> f64 {
    let progress = (step as f64 / DAY_LENGTH as f64) % 1.0 + 0.3;
    1.0 - (PI * progress).cos().abs().powi(3)
}

pub fn update_daylight(world: &mut World, step: u64) {
    world.set_daylight(daylight_at(step));
}
