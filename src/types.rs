use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;

/// Board coordinate. Travels on the wire as a `[row, col]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    pub fn step(self, mv: Move) -> Cell {
        let (d_row, d_col) = mv.delta();
        Cell::new(self.row + d_row, self.col + d_col)
    }

    /// Row-major index into a board-sized array, `None` when off the board.
    pub fn index(self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        Some((self.row * BOARD_SIZE + self.col) as usize)
    }
}

impl From<[i32; 2]> for Cell {
    fn from([row, col]: [i32; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Cell> for [i32; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Expansion order of the path finder. Earlier entries win ties.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UP" => Some(Self::Up),
            "DOWN" => Some(Self::Down),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded game-state update, as seen by a single agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub current_position: Cell,
    pub teammate_positions: Vec<Cell>,
    pub enemy_positions: Vec<Cell>,
    pub coin_positions: Vec<Cell>,
    pub wall_positions: Vec<Cell>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionState {
    NoTarget,
    HasPath,
    NoPath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Real,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Target {
    pub cell: Cell,
    pub kind: TargetKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Decision {
    #[serde(rename = "move")]
    pub mv: Move,
    pub state: DecisionState,
    pub target: Option<Target>,
    #[serde(rename = "pathLen")]
    pub path_len: usize,
}

/// Identity announced on the `new_game` topic before play begins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewGameAnnouncement {
    pub lobby_name: String,
    pub team_name: String,
    pub player_name: String,
}
