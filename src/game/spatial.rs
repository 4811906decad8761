//! Uniform spatial hash grid for proximity queries
//!
//! Divides the ground plane into square cells keyed by
//! `floor(position / cell_size)`. Range queries only visit the cells that
//! cover the query circle.

use glam::Vec3;
use hashbrown::HashMap;

use crate::game::constants::spatial::{CELL_INITIAL_CAPACITY, CELL_SIZE, GRID_INITIAL_CAPACITY};
use crate::util::math::planar_distance;

/// Grid cell key - (x, z) cell coordinates
pub type CellKey = (i32, i32);

/// Slot stored in the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub slot: u32,
    pub position: Vec3,
}

/// Spatial hash grid over pool slots
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Inverse cell size for fast position-to-cell conversion
    inv_cell_size: f32,
    cells: HashMap<CellKey, Vec<SpatialEntry>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::with_capacity(GRID_INITIAL_CAPACITY),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Clear all entries, keeping cell allocations for reuse
    #[inline]
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    #[inline]
    pub fn position_to_cell(&self, position: Vec3) -> CellKey {
        (
            (position.x * self.inv_cell_size).floor() as i32,
            (position.z * self.inv_cell_size).floor() as i32,
        )
    }

    #[inline]
    pub fn insert(&mut self, slot: u32, position: Vec3) {
        let key = self.position_to_cell(position);
        self.cells
            .entry(key)
            .or_insert_with(|| Vec::with_capacity(CELL_INITIAL_CAPACITY))
            .push(SpatialEntry { slot, position });
    }

    /// Remove a slot previously inserted at `position`.
    /// Returns true if the slot was found.
    pub fn remove(&mut self, slot: u32, position: Vec3) -> bool {
        let key = self.position_to_cell(position);
        if let Some(cell) = self.cells.get_mut(&key) {
            if let Some(idx) = cell.iter().position(|e| e.slot == slot) {
                cell.swap_remove(idx);
                return true;
            }
        }
        false
    }

    /// Entries within `radius` of `position` on the ground plane
    pub fn query_radius(&self, position: Vec3, radius: f32) -> impl Iterator<Item = &SpatialEntry> + '_ {
        let radius = radius.max(0.0);
        let (min_x, min_z) = self.position_to_cell(position - Vec3::new(radius, 0.0, radius));
        let (max_x, max_z) = self.position_to_cell(position + Vec3::new(radius, 0.0, radius));

        (min_x..=max_x)
            .flat_map(move |cx| (min_z..=max_z).map(move |cz| (cx, cz)))
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|cell| cell.iter())
            .filter(move |entry| planar_distance(entry.position, position) <= radius)
    }

    /// Drop cells left empty by [`clear`](Self::clear) or removals
    pub fn prune(&mut self) {
        self.cells.retain(|_, cell| !cell.is_empty());
    }

    /// Rebuild the grid from a set of slots
    pub fn rebuild(&mut self, entries: impl Iterator<Item = (u32, Vec3)>) {
        self.clear();
        for (slot, position) in entries {
            self.insert(slot, position);
        }
        self.prune();
    }

    /// Number of cells a radius query scans
    pub fn cells_covering(&self, position: Vec3, radius: f32) -> usize {
        let (min_x, min_z) = self.position_to_cell(position - Vec3::new(radius, 0.0, radius));
        let (max_x, max_z) = self.position_to_cell(position + Vec3::new(radius, 0.0, radius));
        ((max_x - min_x + 1) * (max_z - min_z + 1)) as usize
    }

    pub fn stats(&self) -> SpatialGridStats {
        let non_empty_cells = self.cells.values().filter(|c| !c.is_empty()).count();
        let total_entries: usize = self.cells.values().map(|c| c.len()).sum();
        let max_per_cell = self.cells.values().map(|c| c.len()).max().unwrap_or(0);

        SpatialGridStats {
            cells: self.cells.len(),
            non_empty_cells,
            total_entries,
            max_per_cell,
        }
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(CELL_SIZE)
    }
}

/// Statistics about the spatial grid
#[derive(Debug, Clone)]
pub struct SpatialGridStats {
    /// Cells held by the map, empty ones included
    pub cells: usize,
    pub non_empty_cells: usize,
    pub total_entries: usize,
    pub max_per_cell: usize,
}
