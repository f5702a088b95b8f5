use crate::constants::{FALLBACK_PRUNE_RADIUS, FALLBACK_SEEDS};
use crate::types::Cell;

/// Conjectured coin locations chased when no real coin is visible.
///
/// Seeded once with the four board corners and only ever shrinks; an entry
/// is dropped when the agent comes within `FALLBACK_PRUNE_RADIUS` of it
/// while it is the active target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackCoins {
    cells: Vec<Cell>,
}

impl FallbackCoins {
    pub fn seeded() -> Self {
        Self::from_cells(FALLBACK_SEEDS.to_vec())
    }

    pub fn from_cells(cells: Vec<Cell>) -> Self {
        let mut deduped: Vec<Cell> = Vec::with_capacity(cells.len());
        for cell in cells {
            if !deduped.contains(&cell) {
                deduped.push(cell);
            }
        }
        Self { cells: deduped }
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Drops `target` when `current` is close enough to call it collected.
    /// Returns whether anything was removed.
    pub fn prune_near(&mut self, current: Cell, target: Cell) -> bool {
        if current.manhattan(target) > FALLBACK_PRUNE_RADIUS {
            return false;
        }
        let before = self.cells.len();
        self.cells.retain(|cell| *cell != target);
        self.cells.len() != before
    }
}

impl Default for FallbackCoins {
    fn default() -> Self {
        Self::seeded()
    }
}
