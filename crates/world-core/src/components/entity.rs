//! Entity Components
//!
//! Spatial identity shared by every indexed entity.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use world_events::{Cell, Species};

/// Component: the species an entity belongs to
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpeciesTag(pub Species);

/// Component: an entity's cell on the grid
///
/// Only the entity store constructs or changes positions, so the chunk
/// index always agrees with them. Use `EntityStore::move_to` to relocate.
#[derive(Component, Debug, PartialEq, Eq)]
pub struct Position(Cell);

impl Position {
    pub(crate) fn new(cell: Cell) -> Self {
        Self(cell)
    }

    pub(crate) fn set(&mut self, cell: Cell) {
        self.0 = cell;
    }

    pub fn cell(&self) -> Cell {
        self.0
    }
}

/// Component: direction an entity is facing, one of the four unit steps
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facing {
    pub dx: i32,
    pub dy: i32,
}

impl Facing {
    pub const NORTH: Facing = Facing { dx: 0, dy: -1 };
    pub const SOUTH: Facing = Facing { dx: 0, dy: 1 };
    pub const WEST: Facing = Facing { dx: -1, dy: 0 };
    pub const EAST: Facing = Facing { dx: 1, dy: 0 };

    /// The four unit steps, in the order random moves pick from.
    pub const ALL: [Facing; 4] = [Facing::WEST, Facing::EAST, Facing::NORTH, Facing::SOUTH];

    /// The cell one step ahead of `cell`.
    pub fn ahead(&self, cell: Cell) -> Cell {
        cell.offset(self.dx, self.dy)
    }
}

impl Default for Facing {
    fn default() -> Self {
        Facing::SOUTH
    }
}
