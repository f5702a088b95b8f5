use crate::constants::BOARD_SIZE;
use crate::types::{BoardSnapshot, Cell};

/// Text rows for the operator console. Later layers overwrite earlier ones:
/// self, teammates, enemies, coins, walls.
pub fn render_board(snapshot: &BoardSnapshot) -> Vec<String> {
    let size = BOARD_SIZE as usize;
    let mut grid = vec![vec!['.'; size]; size];

    let mut paint = |cells: &[Cell], glyph: char| {
        for cell in cells {
            if cell.in_bounds() {
                grid[cell.row as usize][cell.col as usize] = glyph;
            }
        }
    };
    paint(&[snapshot.current_position], 'P');
    paint(&snapshot.teammate_positions, 'T');
    paint(&snapshot.enemy_positions, 'E');
    paint(&snapshot.coin_positions, 'C');
    paint(&snapshot.wall_positions, 'W');

    grid.into_iter()
        .map(|row| {
            row.into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
