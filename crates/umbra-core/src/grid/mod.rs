//! Placement grid: world/cell mapping, cell state, corruption.
//!
//! Blocks may only be placed on corrupted (unlocked), unoccupied cells
//! within ability reach. The simulation core treats cell coordinates as
//! opaque keys; this module owns the mapping.

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::geom::Vec2;

/// Integer coordinate of one grid cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn below(self) -> CellCoord {
        CellCoord::new(self.x, self.y - 1)
    }

    /// The cell itself plus its four orthogonal neighbors.
    pub fn plus_neighborhood(self) -> [CellCoord; 5] {
        [
            self,
            CellCoord::new(self.x, self.y + 1),
            CellCoord::new(self.x, self.y - 1),
            CellCoord::new(self.x - 1, self.y),
            CellCoord::new(self.x + 1, self.y),
        ]
    }
}

bitflags! {
    /// Per-cell state flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// Corrupted and therefore available for placement.
        const UNLOCKED = 0x01;
        /// Currently holding a block.
        const OCCUPIED = 0x02;
    }
}

impl Serialize for CellFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(CellFlags::from_bits_truncate(bits))
    }
}

/// Outcome of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum PlacementOutcome {
    Success,
    /// No floor at the aimed position (nor one cell below it).
    NoCell,
    /// Cell exists but is not corrupted yet.
    CellLocked,
    /// Cell already holds a block.
    CellOccupied,
    /// Cell is beyond the requester's reach.
    OutOfRange,
}

/// The level's placement grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    pub cell_size: f32,
    cells: HashMap<CellCoord, CellFlags>,
    spawn_cell: CellCoord,
}

impl GridMap {
    pub fn new(cell_size: f32, spawn_cell: CellCoord) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            spawn_cell,
        }
    }

    /// Register floor cells; typically called once at level load.
    pub fn insert_floor<I: IntoIterator<Item = CellCoord>>(&mut self, cells: I) {
        for cell in cells {
            self.cells.entry(cell).or_insert(CellFlags::empty());
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn spawn_cell(&self) -> CellCoord {
        self.spawn_cell
    }

    pub fn world_to_cell(&self, pos: Vec2) -> CellCoord {
        CellCoord::new(
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn is_unlocked(&self, cell: CellCoord) -> bool {
        self.cells
            .get(&cell)
            .is_some_and(|f| f.contains(CellFlags::UNLOCKED))
    }

    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells
            .get(&cell)
            .is_some_and(|f| f.contains(CellFlags::OCCUPIED))
    }

    /// Resolve a world position to a placeable cell, falling back one cell
    /// down when the aimed cell has no floor (aiming at a block's face).
    pub fn resolve_cell(&self, world_pos: Vec2) -> Option<CellCoord> {
        let cell = self.world_to_cell(world_pos);
        if self.contains(cell) {
            return Some(cell);
        }
        let below = cell.below();
        self.contains(below).then_some(below)
    }

    /// Check whether a block could go on `cell`, requested from
    /// `requester_pos` with the given reach.
    pub fn check_placement(
        &self,
        cell: CellCoord,
        requester_pos: Vec2,
        max_range: f32,
    ) -> PlacementOutcome {
        let Some(flags) = self.cells.get(&cell) else {
            return PlacementOutcome::NoCell;
        };
        if !flags.contains(CellFlags::UNLOCKED) {
            return PlacementOutcome::CellLocked;
        }
        if flags.contains(CellFlags::OCCUPIED) {
            return PlacementOutcome::CellOccupied;
        }
        if self.cell_center(cell).distance(requester_pos) > max_range {
            return PlacementOutcome::OutOfRange;
        }
        PlacementOutcome::Success
    }

    pub fn occupy(&mut self, cell: CellCoord) {
        if let Some(flags) = self.cells.get_mut(&cell) {
            flags.insert(CellFlags::OCCUPIED);
        }
    }

    pub fn release(&mut self, cell: CellCoord) {
        if let Some(flags) = self.cells.get_mut(&cell) {
            flags.remove(CellFlags::OCCUPIED);
        }
    }

    /// Corrupt (unlock) a single cell. Returns whether anything changed.
    pub fn corrupt_cell(&mut self, cell: CellCoord) -> bool {
        match self.cells.get_mut(&cell) {
            Some(flags) if !flags.contains(CellFlags::UNLOCKED) => {
                flags.insert(CellFlags::UNLOCKED);
                true
            }
            _ => false,
        }
    }

    /// Corrupt a plus-shaped neighborhood around `world_pos` (the player
    /// death splash). The spawn cell never corrupts. Returns the cells
    /// that actually changed.
    pub fn corrupt_around(&mut self, world_pos: Vec2) -> Vec<CellCoord> {
        let center = self.world_to_cell(world_pos);
        if center == self.spawn_cell {
            return Vec::new();
        }

        let mut changed = Vec::new();
        for cell in center.plus_neighborhood() {
            if cell == self.spawn_cell {
                continue;
            }
            if self.corrupt_cell(cell) {
                changed.push(cell);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridMap {
        let mut g = GridMap::new(1.0, CellCoord::new(0, 0));
        g.insert_floor((0..5).flat_map(|x| (0..5).map(move |y| CellCoord::new(x, y))));
        g
    }

    #[test]
    fn world_to_cell_round_trip() {
        let g = grid();
        let cell = g.world_to_cell(Vec2::new(2.3, 4.9));
        assert_eq!(cell, CellCoord::new(2, 4));
        assert_eq!(g.cell_center(cell), Vec2::new(2.5, 4.5));
    }

    #[test]
    fn placement_checks_in_order() {
        let mut g = grid();
        let cell = CellCoord::new(2, 2);
        let near = g.cell_center(cell);

        assert_eq!(
            g.check_placement(CellCoord::new(9, 9), near, 3.0),
            PlacementOutcome::NoCell
        );
        assert_eq!(
            g.check_placement(cell, near, 3.0),
            PlacementOutcome::CellLocked
        );

        g.corrupt_cell(cell);
        assert_eq!(
            g.check_placement(cell, near, 3.0),
            PlacementOutcome::Success
        );

        g.occupy(cell);
        assert_eq!(
            g.check_placement(cell, near, 3.0),
            PlacementOutcome::CellOccupied
        );

        g.release(cell);
        assert_eq!(
            g.check_placement(cell, Vec2::new(40.0, 0.0), 3.0),
            PlacementOutcome::OutOfRange
        );
    }

    #[test]
    fn resolve_falls_back_one_cell_down() {
        let g = grid();
        // (2, 5) has no floor; (2, 4) does.
        assert_eq!(
            g.resolve_cell(Vec2::new(2.5, 5.5)),
            Some(CellCoord::new(2, 4))
        );
        assert_eq!(g.resolve_cell(Vec2::new(9.5, 9.5)), None);
    }

    #[test]
    fn corruption_splash_spares_spawn() {
        let mut g = grid();
        let changed = g.corrupt_around(Vec2::new(1.5, 0.5));
        // Plus shape around (1,0): (1,0) (1,1) (2,0) and (1,-1) missing,
        // (0,0) is spawn and exempt.
        assert!(changed.contains(&CellCoord::new(1, 0)));
        assert!(changed.contains(&CellCoord::new(1, 1)));
        assert!(changed.contains(&CellCoord::new(2, 0)));
        assert!(!changed.contains(&CellCoord::new(0, 0)));
        assert!(!g.is_unlocked(CellCoord::new(0, 0)));
    }

    #[test]
    fn death_on_spawn_corrupts_nothing() {
        let mut g = grid();
        assert!(g.corrupt_around(Vec2::new(0.5, 0.5)).is_empty());
    }
}
