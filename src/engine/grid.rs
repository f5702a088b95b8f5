use crate::constants::BOARD_CELLS;
use crate::types::Cell;

/// Passability of every board cell, rebuilt from each snapshot's walls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObstacleMap {
    blocked: [bool; BOARD_CELLS],
}

impl ObstacleMap {
    pub fn open() -> Self {
        Self {
            blocked: [false; BOARD_CELLS],
        }
    }

    /// Off-board walls have no cell to occupy and are dropped.
    pub fn from_walls(walls: &[Cell]) -> Self {
        let mut map = Self::open();
        for wall in walls {
            if let Some(idx) = wall.index() {
                map.blocked[idx] = true;
            }
        }
        map
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        cell.index().map(|idx| !self.blocked[idx]).unwrap_or(false)
    }

    #[cfg(test)]
    pub(crate) fn wall_count(&self) -> usize {
        self.blocked.iter().filter(|blocked| **blocked).count()
    }
}

impl Default for ObstacleMap {
    fn default() -> Self {
        Self::open()
    }
}
