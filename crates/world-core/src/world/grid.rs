//! Material Grid
//!
//! Dense per-cell material storage with bounds-checked access and region masks.

use std::collections::BTreeMap;
use thiserror::Error;
use world_events::{Area, Cell, Material};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {cell} lies outside the {area} world")]
    OutOfBounds { cell: Cell, area: Area },
}

/// Half-open rectangle `[xmin, xmax) x [ymin, ymax)` of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Region {
    pub fn new(xmin: i32, ymin: i32, xmax: i32, ymax: i32) -> Self {
        Self {
            xmin,
            ymin,
            xmax: xmax.max(xmin),
            ymax: ymax.max(ymin),
        }
    }

    /// The whole area as a region.
    pub fn of_area(area: Area) -> Self {
        Self::new(0, 0, area.width, area.height)
    }

    pub fn width(&self) -> i32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i32 {
        self.ymax - self.ymin
    }

    pub fn cell_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.xmin && cell.x < self.xmax && cell.y >= self.ymin && cell.y < self.ymax
    }

    /// Intersection with the world area.
    pub fn clip(&self, area: Area) -> Self {
        Self::new(
            self.xmin.max(0),
            self.ymin.max(0),
            self.xmax.min(area.width),
            self.ymax.min(area.height),
        )
    }

    /// Cells in column order: x outer, y inner.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.xmin..self.xmax).flat_map(move |x| (self.ymin..self.ymax).map(move |y| Cell::new(x, y)))
    }
}

/// Boolean view over a region marking cells that hold one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    region: Region,
    bits: Vec<bool>,
}

impl Mask {
    pub fn region(&self) -> Region {
        self.region
    }

    /// Number of marked cells.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }

    pub fn get(&self, cell: Cell) -> bool {
        if !self.region.contains(cell) {
            return false;
        }
        let offset = (cell.x - self.region.xmin) as usize * self.region.height() as usize
            + (cell.y - self.region.ymin) as usize;
        self.bits[offset]
    }

    /// Marked cells in column order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.region
            .cells()
            .zip(self.bits.iter())
            .filter_map(|(cell, bit)| bit.then_some(cell))
    }

    /// The `n`-th marked cell in column order.
    pub fn nth(&self, n: usize) -> Option<Cell> {
        self.cells().nth(n)
    }
}

/// Per-cell materials of a world, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialGrid {
    area: Area,
    cells: Vec<Material>,
}

impl MaterialGrid {
    pub fn new(area: Area, fill: Material) -> Self {
        Self {
            area,
            cells: vec![fill; area.cell_count()],
        }
    }

    pub fn area(&self) -> Area {
        self.area
    }

    /// Material at `cell`, or [`Material::Void`] outside the area.
    pub fn get(&self, cell: Cell) -> Material {
        self.area
            .index(cell)
            .map(|i| self.cells[i])
            .unwrap_or(Material::Void)
    }

    /// Writes a single cell and returns the material it replaced.
    pub fn set(&mut self, cell: Cell, material: Material) -> Result<Material, GridError> {
        let index = self.area.index(cell).ok_or(GridError::OutOfBounds {
            cell,
            area: self.area,
        })?;
        Ok(std::mem::replace(&mut self.cells[index], material))
    }

    pub fn fill(&mut self, material: Material) {
        self.cells.fill(material);
    }

    /// Marks the cells of `region` equal to `material`. Cells outside the
    /// area compare as [`Material::Void`].
    pub fn mask(&self, region: Region, material: Material) -> Mask {
        let bits = region.cells().map(|cell| self.get(cell) == material).collect();
        Mask { region, bits }
    }

    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|m| **m == material).count()
    }

    /// Cell count per material, absent materials omitted.
    pub fn histogram(&self) -> BTreeMap<Material, usize> {
        let mut counts = BTreeMap::new();
        for material in &self.cells {
            *counts.entry(*material).or_insert(0) += 1;
        }
        counts
    }

    /// Material codes in row-major order, for byte-exact comparison.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|m| m.code()).collect()
    }

    /// Text rendering, one string per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.area.width.max(1) as usize)
            .map(|row| row.iter().map(|m| m.glyph()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped_grid() -> MaterialGrid {
        let mut grid = MaterialGrid::new(Area::new(6, 4), Material::Grass);
        for y in 0..4 {
            grid.set(Cell::new(2, y), Material::Stone).unwrap();
        }
        grid.set(Cell::new(5, 3), Material::Water).unwrap();
        grid
    }

    #[test]
    fn test_out_of_range_reads_return_void() {
        let grid = striped_grid();
        assert_eq!(grid.get(Cell::new(-1, 0)), Material::Void);
        assert_eq!(grid.get(Cell::new(6, 0)), Material::Void);
        assert_eq!(grid.get(Cell::new(0, 4)), Material::Void);
        assert_eq!(grid.get(Cell::new(2, 1)), Material::Stone);
    }

    #[test]
    fn test_out_of_range_write_fails() {
        let mut grid = striped_grid();
        let before = grid.clone();
        let err = grid.set(Cell::new(9, 9), Material::Lava).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { .. }));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut grid = striped_grid();
        assert_eq!(grid.set(Cell::new(2, 0), Material::Path), Ok(Material::Stone));
        assert_eq!(grid.get(Cell::new(2, 0)), Material::Path);
    }

    #[test]
    fn test_mask_matches_brute_force() {
        let grid = striped_grid();
        let regions = [
            Region::new(0, 0, 6, 4),
            Region::new(1, 1, 4, 3),
            Region::new(4, 2, 9, 7),
            Region::new(-2, -2, 3, 2),
        ];
        for region in regions {
            for material in [Material::Grass, Material::Stone, Material::Water, Material::Void] {
                let mask = grid.mask(region, material);
                let mut expected = 0;
                for x in region.xmin..region.xmax {
                    for y in region.ymin..region.ymax {
                        let cell = Cell::new(x, y);
                        let hit = grid.get(cell) == material;
                        assert_eq!(mask.get(cell), hit, "{cell} in {region:?}");
                        expected += usize::from(hit);
                    }
                }
                assert_eq!(mask.count(), expected);
                assert_eq!(mask.cells().count(), expected);
            }
        }
    }

    #[test]
    fn test_mask_cells_in_column_order() {
        let grid = striped_grid();
        let mask = grid.mask(Region::new(0, 0, 6, 4), Material::Stone);
        let cells: Vec<_> = mask.cells().collect();
        assert_eq!(cells.first(), Some(&Cell::new(2, 0)));
        assert_eq!(mask.nth(3), Some(Cell::new(2, 3)));
        assert_eq!(mask.nth(4), None);
    }

    #[test]
    fn test_histogram_and_rows() {
        let grid = striped_grid();
        let histogram = grid.histogram();
        assert_eq!(histogram[&Material::Stone], 4);
        assert_eq!(histogram[&Material::Water], 1);
        assert_eq!(histogram[&Material::Grass], 19);
        assert_eq!(grid.rows()[0], "..#...");
        assert_eq!(grid.rows()[3], "..#..~");
        assert_eq!(grid.to_bytes().len(), 24);
    }

    #[test]
    fn test_region_clip() {
        let region = Region::new(60, -3, 72, 9).clip(Area::new(64, 64));
        assert_eq!(region, Region::new(60, 0, 64, 9));
        assert_eq!(region.cell_count(), 36);
    }
}
