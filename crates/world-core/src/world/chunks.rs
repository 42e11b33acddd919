//! Chunk Geometry
//!
//! Chunks are fixed-size rectangular partitions of the grid. They are never
//! stored, only derived from cell coordinates by integer division.

use world_events::{Area, Cell};

use super::grid::Region;

/// Chunk coordinate, `floor(cell / chunk_size)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub cx: i32,
    pub cy: i32,
}

impl ChunkKey {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }
}

/// How an area is partitioned into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    area: Area,
    chunk: Area,
    columns: i32,
    rows: i32,
}

impl ChunkLayout {
    /// Both dimensions of `area` and `chunk` must be positive.
    pub fn new(area: Area, chunk: Area) -> Self {
        let columns = (area.width + chunk.width - 1) / chunk.width;
        let rows = (area.height + chunk.height - 1) / chunk.height;
        Self {
            area,
            chunk,
            columns,
            rows,
        }
    }

    pub fn chunk_size(&self) -> Area {
        self.chunk
    }

    /// Number of chunks covering the area.
    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key_of(&self, cell: Cell) -> ChunkKey {
        ChunkKey::new(
            cell.x.div_euclid(self.chunk.width),
            cell.y.div_euclid(self.chunk.height),
        )
    }

    /// Dense row-major slot of a chunk covering the area.
    pub fn slot(&self, key: ChunkKey) -> Option<usize> {
        if key.cx < 0 || key.cy < 0 || key.cx >= self.columns || key.cy >= self.rows {
            return None;
        }
        Some(key.cy as usize * self.columns as usize + key.cx as usize)
    }

    /// Cells of a chunk, clipped to the area at the far edges.
    pub fn region(&self, key: ChunkKey) -> Region {
        let xmin = key.cx * self.chunk.width;
        let ymin = key.cy * self.chunk.height;
        Region::new(xmin, ymin, xmin + self.chunk.width, ymin + self.chunk.height).clip(self.area)
    }

    /// Every chunk covering the area in row-major order (`cy` outer, `cx` inner).
    pub fn keys(&self) -> impl Iterator<Item = ChunkKey> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |cy| (0..columns).map(move |cx| ChunkKey::new(cx, cy)))
    }
}
