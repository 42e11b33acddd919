//! Entity Store
//!
//! Live entities backed by a bevy ECS world, with a chunk-keyed spatial index,
//! a cell occupancy map and per-species counts kept up to date incrementally.

use bevy_ecs::prelude::*;
use thiserror::Error;
use world_events::{Area, Cell, Species};

use super::chunks::{ChunkKey, ChunkLayout};
use crate::components::entity::{Facing, Position, SpeciesTag};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("cell {0} lies outside the world")]
    OutOfBounds(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
    #[error("entity {0:?} is not in the store")]
    UnknownEntity(Entity),
}

/// Instance count per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeciesCounts([usize; Species::COUNT]);

impl SpeciesCounts {
    pub fn get(&self, species: Species) -> usize {
        self.0[species.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    fn increment(&mut self, species: Species) {
        self.0[species.index()] += 1;
    }

    fn decrement(&mut self, species: Species) {
        let slot = &mut self.0[species.index()];
        *slot = slot.saturating_sub(1);
    }
}

#[derive(Debug, Default)]
struct ChunkBucket {
    members: Vec<Entity>,
    counts: SpeciesCounts,
}

impl ChunkBucket {
    fn insert(&mut self, entity: Entity, species: Species) {
        self.members.push(entity);
        self.counts.increment(species);
    }

    fn remove(&mut self, entity: Entity, species: Species) {
        if let Some(i) = self.members.iter().position(|e| *e == entity) {
            self.members.remove(i);
            self.counts.decrement(species);
        }
    }
}

/// Spatially indexed entity storage for one world.
pub struct EntityStore {
    ecs: bevy_ecs::world::World,
    area: Area,
    layout: ChunkLayout,
    /// Live entities in insertion order
    order: Vec<Entity>,
    occupancy: Vec<Option<Entity>>,
    buckets: Vec<ChunkBucket>,
    totals: SpeciesCounts,
}

impl EntityStore {
    pub fn new(area: Area, chunk_size: Area) -> Self {
        let layout = ChunkLayout::new(area, chunk_size);
        let mut buckets = Vec::with_capacity(layout.len());
        buckets.resize_with(layout.len(), ChunkBucket::default);
        Self {
            ecs: bevy_ecs::world::World::new(),
            area,
            layout,
            order: Vec::new(),
            occupancy: vec![None; area.cell_count()],
            buckets,
            totals: SpeciesCounts::default(),
        }
    }

    /// Drops every entity and index entry.
    pub fn clear(&mut self) {
        *self = Self::new(self.area, self.layout.chunk_size());
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Inserts a new entity of `species` at `cell`. `state` carries any
    /// species-specific components.
    pub fn add<B: Bundle>(
        &mut self,
        species: Species,
        cell: Cell,
        state: B,
    ) -> Result<Entity, StoreError> {
        let index = self.area.index(cell).ok_or(StoreError::OutOfBounds(cell))?;
        if self.occupancy[index].is_some() {
            return Err(StoreError::Occupied(cell));
        }
        let slot = self.chunk_slot(cell)?;

        let entity = self
            .ecs
            .spawn((SpeciesTag(species), Position::new(cell), Facing::default(), state))
            .id();
        self.occupancy[index] = Some(entity);
        self.buckets[slot].insert(entity, species);
        self.totals.increment(species);
        self.order.push(entity);
        Ok(entity)
    }

    /// Removes an entity, returning the species and cell it had.
    pub fn remove(&mut self, entity: Entity) -> Result<(Species, Cell), StoreError> {
        let (species, cell) = self.locate(entity)?;
        let slot = self.chunk_slot(cell)?;
        if let Some(index) = self.area.index(cell) {
            self.occupancy[index] = None;
        }
        self.buckets[slot].remove(entity, species);
        self.totals.decrement(species);
        self.order.retain(|e| *e != entity);
        self.ecs.despawn(entity);
        Ok((species, cell))
    }

    /// Relocates an entity, moving it between chunk buckets when needed.
    pub fn move_to(&mut self, entity: Entity, cell: Cell) -> Result<(), StoreError> {
        let (species, from) = self.locate(entity)?;
        if from == cell {
            return Ok(());
        }
        let to_index = self.area.index(cell).ok_or(StoreError::OutOfBounds(cell))?;
        if self.occupancy[to_index].is_some() {
            return Err(StoreError::Occupied(cell));
        }
        let from_slot = self.chunk_slot(from)?;
        let to_slot = self.chunk_slot(cell)?;

        if let Some(from_index) = self.area.index(from) {
            self.occupancy[from_index] = None;
        }
        self.occupancy[to_index] = Some(entity);
        if from_slot != to_slot {
            self.buckets[from_slot].remove(entity, species);
            self.buckets[to_slot].insert(entity, species);
        }
        if let Some(mut position) = self.ecs.get_mut::<Position>(entity) {
            position.set(cell);
        }
        Ok(())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.ecs.get::<SpeciesTag>(entity).is_some()
    }

    pub fn species_of(&self, entity: Entity) -> Option<Species> {
        self.ecs.get::<SpeciesTag>(entity).map(|tag| tag.0)
    }

    pub fn cell_of(&self, entity: Entity) -> Option<Cell> {
        self.ecs.get::<Position>(entity).map(Position::cell)
    }

    pub fn facing_of(&self, entity: Entity) -> Option<Facing> {
        self.ecs.get::<Facing>(entity).copied()
    }

    pub fn set_facing(&mut self, entity: Entity, facing: Facing) -> Result<(), StoreError> {
        let mut current = self
            .ecs
            .get_mut::<Facing>(entity)
            .ok_or(StoreError::UnknownEntity(entity))?;
        *current = facing;
        Ok(())
    }

    /// Entity standing on `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<Entity> {
        self.area.index(cell).and_then(|i| self.occupancy[i])
    }

    /// In bounds and unoccupied.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.area
            .index(cell)
            .map(|i| self.occupancy[i].is_none())
            .unwrap_or(false)
    }

    /// Live entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live instances of a species across the world.
    pub fn count(&self, species: Species) -> usize {
        self.totals.get(species)
    }

    pub fn counts(&self) -> SpeciesCounts {
        self.totals
    }

    /// Live instances of a species in one chunk.
    pub fn count_in_chunk(&self, key: ChunkKey, species: Species) -> usize {
        self.layout
            .slot(key)
            .map(|slot| self.buckets[slot].counts.get(species))
            .unwrap_or(0)
    }

    /// Entities indexed under a chunk, in the order they entered it.
    pub fn chunk_members(&self, key: ChunkKey) -> &[Entity] {
        self.layout
            .slot(key)
            .map(|slot| self.buckets[slot].members.as_slice())
            .unwrap_or(&[])
    }

    /// Instances of a species in one chunk, in the order they entered it.
    pub fn members_of(&self, key: ChunkKey, species: Species) -> Vec<Entity> {
        self.chunk_members(key)
            .iter()
            .copied()
            .filter(|e| self.species_of(*e) == Some(species))
            .collect()
    }

    /// Reads a component of an entity.
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.ecs.get::<C>(entity)
    }

    /// Mutable access to collaborator-owned state.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<Mut<'_, C>> {
        self.ecs.get_mut::<C>(entity)
    }

    /// Attaches or replaces a component on a live entity.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), StoreError> {
        let mut entity_mut = self
            .ecs
            .get_entity_mut(entity)
            .ok_or(StoreError::UnknownEntity(entity))?;
        entity_mut.insert(component);
        Ok(())
    }

    fn locate(&self, entity: Entity) -> Result<(Species, Cell), StoreError> {
        match (self.species_of(entity), self.cell_of(entity)) {
            (Some(species), Some(cell)) => Ok((species, cell)),
            _ => Err(StoreError::UnknownEntity(entity)),
        }
    }

    fn chunk_slot(&self, cell: Cell) -> Result<usize, StoreError> {
        self.layout
            .slot(self.layout.key_of(cell))
            .ok_or(StoreError::OutOfBounds(cell))
    }

    /// Checks that every live entity sits in the bucket matching its cell and
    /// that the counts agree with the buckets.
    #[cfg(test)]
    pub(crate) fn assert_index_consistent(&self) {
        let mut seen = 0;
        for key in self.layout.keys() {
            let members = self.chunk_members(key);
            for entity in members {
                let cell = self.cell_of(*entity).expect("indexed entity has a position");
                assert_eq!(self.layout.key_of(cell), key);
                assert_eq!(self.occupant(cell), Some(*entity));
            }
            for &species in Species::all() {
                assert_eq!(
                    self.count_in_chunk(key, species),
                    self.members_of(key, species).len()
                );
            }
            seen += members.len();
        }
        assert_eq!(seen, self.len());
        assert_eq!(self.totals.total(), self.len());
    }
}
