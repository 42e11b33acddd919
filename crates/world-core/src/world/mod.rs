//! World State
//!
//! The material grid, the spatially indexed entity store and the per-episode
//! generator, owned together by one [`World`].

pub mod chunks;
pub mod grid;
pub mod store;

use bevy_ecs::entity::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use world_events::{
    Area, Cell, DespawnCause, EventKind, Material, SpawnCause, Species, WorldEvent,
};

use crate::components::mobs::spawn_species;
use crate::config::{ConfigError, WorldConfig};

pub use chunks::{ChunkKey, ChunkLayout};
pub use grid::{GridError, Mask, MaterialGrid, Region};
pub use store::{EntityStore, SpeciesCounts, StoreError};

/// The one random generator of a world. Every generation and balancing
/// function draws from it, so a seed fixes an entire episode.
pub type WorldRng = ChaCha8Rng;

pub struct World {
    config: WorldConfig,
    grid: MaterialGrid,
    store: EntityStore,
    rng: WorldRng,
    seed: u64,
    episode: u64,
    tick: u64,
    daylight: f64,
    player: Option<Entity>,
    events: Vec<WorldEvent>,
    next_event_id: u64,
}

impl World {
    /// Validates the configuration and builds an empty world.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: MaterialGrid::new(config.area, Material::Void),
            store: EntityStore::new(config.area, config.chunk_size),
            rng: WorldRng::seed_from_u64(0),
            seed: 0,
            episode: 0,
            tick: 0,
            daylight: 0.0,
            player: None,
            events: Vec::new(),
            next_event_id: 1,
            config,
        })
    }

    /// Starts a new episode: reseeds the generator and clears the grid, the
    /// entity index, the clock and pending events.
    pub fn reset(&mut self, seed: u64) {
        self.rng = WorldRng::seed_from_u64(seed);
        self.seed = seed;
        self.episode += 1;
        self.tick = 0;
        self.daylight = 0.0;
        self.grid.fill(Material::Void);
        self.store.clear();
        self.player = None;
        self.events.clear();
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn area(&self) -> Area {
        self.config.area
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Episodes started since construction.
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    pub fn daylight(&self) -> f64 {
        self.daylight
    }

    pub fn set_daylight(&mut self, daylight: f64) {
        self.daylight = daylight.clamp(0.0, 1.0);
    }

    pub fn rng(&mut self) -> &mut WorldRng {
        &mut self.rng
    }

    // --- grid ---

    /// Material at `cell`, [`Material::Void`] outside the area.
    pub fn get(&self, cell: Cell) -> Material {
        self.grid.get(cell)
    }

    pub fn set(&mut self, cell: Cell, material: Material) -> Result<Material, GridError> {
        self.grid.set(cell, material)
    }

    pub fn mask(&self, region: Region, material: Material) -> Mask {
        self.grid.mask(region, material)
    }

    pub fn grid(&self) -> &MaterialGrid {
        &self.grid
    }

    /// Replaces the whole grid. Used to commit a finished terrain pass.
    pub(crate) fn commit_grid(&mut self, grid: MaterialGrid) {
        debug_assert_eq!(grid.area(), self.config.area);
        self.grid = grid;
    }

    // --- chunks ---

    /// Every chunk covering the area, row-major.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkKey, Region)> + '_ {
        let layout = *self.store.layout();
        layout.keys().map(move |key| (key, layout.region(key)))
    }

    pub fn chunk_layout(&self) -> &ChunkLayout {
        self.store.layout()
    }

    // --- entities ---

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Mutable store access for collaborators that own entity state.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    pub fn player(&self) -> Option<Entity> {
        self.player.filter(|p| self.store.contains(*p))
    }

    pub fn player_cell(&self) -> Option<Cell> {
        self.player().and_then(|p| self.store.cell_of(p))
    }

    /// Chebyshev distance from `cell` to the player, `None` without a player.
    pub fn player_distance(&self, cell: Cell) -> Option<i32> {
        self.player_cell().map(|p| p.chebyshev(cell))
    }

    /// Creates the player at `cell`. Any previous player is removed first.
    pub fn spawn_player(&mut self, cell: Cell) -> Result<Entity, StoreError> {
        if let Some(previous) = self.player() {
            self.remove(previous, DespawnCause::Behavior)?;
        }
        let player = self.spawn(Species::Player, cell, SpawnCause::EpisodeStart)?;
        self.player = Some(player);
        Ok(player)
    }

    /// Creates an entity with its starting state and records the spawn.
    pub fn spawn(
        &mut self,
        species: Species,
        cell: Cell,
        cause: SpawnCause,
    ) -> Result<Entity, StoreError> {
        let entity = spawn_species(&mut self.store, species, cell, self.player)?;
        self.record(species, cell, EventKind::Spawned { cause });
        Ok(entity)
    }

    /// Removes an entity and records the despawn.
    pub fn remove(&mut self, entity: Entity, cause: DespawnCause) -> Result<(), StoreError> {
        let (species, cell) = self.store.remove(entity)?;
        self.record(species, cell, EventKind::Despawned { cause });
        Ok(())
    }

    pub fn move_to(&mut self, entity: Entity, cell: Cell) -> Result<(), StoreError> {
        self.store.move_to(entity, cell)
    }

    /// Live entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        self.store.entities()
    }

    pub fn count(&self, species: Species) -> usize {
        self.store.count(species)
    }

    /// Whether an entity may stand on `cell`: in bounds, free and of a
    /// material the species can walk on.
    pub fn is_free(&self, cell: Cell, walkable: &[Material]) -> bool {
        self.store.is_free(cell) && walkable.contains(&self.grid.get(cell))
    }

    // --- events ---

    fn record(&mut self, species: Species, cell: Cell, kind: EventKind) {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(WorldEvent {
            id,
            episode: self.episode,
            tick: self.tick,
            species,
            cell,
            kind,
        });
    }

    pub fn pending_events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Takes every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}
