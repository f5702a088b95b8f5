use std::collections::VecDeque;

use crate::constants::BOARD_CELLS;
use crate::engine::grid::ObstacleMap;
use crate::types::{Cell, Move};

/// Breadth-first search over the 4-neighborhood.
///
/// Neighbors are expanded in `Move::ALL` order, so among several shortest
/// paths the one whose earliest branch uses the earlier direction wins.
/// An empty result means either `start == goal` or no route exists.
pub fn find_path(start: Cell, goal: Cell, map: &ObstacleMap) -> Vec<Move> {
    if start == goal {
        return Vec::new();
    }
    let (Some(start_idx), Some(goal_idx)) = (start.index(), goal.index()) else {
        return Vec::new();
    };

    let mut came_from: [Option<(usize, Move)>; BOARD_CELLS] = [None; BOARD_CELLS];
    let mut visited = [false; BOARD_CELLS];
    visited[start_idx] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return rebuild_path(&came_from, start_idx, goal_idx);
        }
        let Some(current_idx) = current.index() else {
            continue;
        };
        for mv in Move::ALL {
            let next = current.step(mv);
            if !map.is_passable(next) {
                continue;
            }
            let Some(next_idx) = next.index() else {
                continue;
            };
            if visited[next_idx] {
                continue;
            }
            visited[next_idx] = true;
            came_from[next_idx] = Some((current_idx, mv));
            queue.push_back(next);
        }
    }

    Vec::new()
}

fn rebuild_path(
    came_from: &[Option<(usize, Move)>; BOARD_CELLS],
    start_idx: usize,
    goal_idx: usize,
) -> Vec<Move> {
    let mut path = Vec::new();
    let mut cursor = goal_idx;
    while cursor != start_idx {
        let Some((prev, mv)) = came_from[cursor] else {
            return Vec::new();
        };
        path.push(mv);
        cursor = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::constants::BOARD_SIZE;

    const UNREACHABLE: u32 = u32::MAX;

    fn all_cells() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Cell::new(row, col)))
    }

    fn random_walls(seed: u64, density: f64) -> Vec<Cell> {
        let mut rng = StdRng::seed_from_u64(seed);
        all_cells().filter(|_| rng.random_bool(density)).collect()
    }

    /// Floyd-Warshall over passable cells; independent of the BFS under test.
    fn all_pairs_distances(map: &ObstacleMap) -> Vec<Vec<u32>> {
        let mut dist = vec![vec![UNREACHABLE; BOARD_CELLS]; BOARD_CELLS];
        for cell in all_cells() {
            let Some(idx) = cell.index() else { continue };
            dist[idx][idx] = 0;
            if !map.is_passable(cell) {
                continue;
            }
            for mv in Move::ALL {
                let next = cell.step(mv);
                if map.is_passable(next) {
                    if let Some(next_idx) = next.index() {
                        dist[idx][next_idx] = 1;
                    }
                }
            }
        }
        for k in 0..BOARD_CELLS {
            for i in 0..BOARD_CELLS {
                if dist[i][k] == UNREACHABLE {
                    continue;
                }
                for j in 0..BOARD_CELLS {
                    if dist[k][j] == UNREACHABLE {
                        continue;
                    }
                    let through = dist[i][k] + dist[k][j];
                    if through < dist[i][j] {
                        dist[i][j] = through;
                    }
                }
            }
        }
        dist
    }

    fn walk(start: Cell, path: &[Move], map: &ObstacleMap) -> Option<Cell> {
        let mut cursor = start;
        for mv in path {
            cursor = cursor.step(*mv);
            if !map.is_passable(cursor) {
                return None;
            }
        }
        Some(cursor)
    }

    #[test]
    fn open_board_straight_line() {
        let map = ObstacleMap::open();
        let path = find_path(Cell::new(5, 5), Cell::new(5, 7), &map);
        assert_eq!(path, vec![Move::Right, Move::Right]);
    }

    #[test]
    fn start_equal_to_goal_yields_empty_path() {
        let map = ObstacleMap::open();
        assert!(find_path(Cell::new(3, 3), Cell::new(3, 3), &map).is_empty());
    }

    #[test]
    fn ties_prefer_earlier_directions() {
        let map = ObstacleMap::open();
        let path = find_path(Cell::new(5, 5), Cell::new(7, 7), &map);
        assert_eq!(path, vec![Move::Down, Move::Down, Move::Right, Move::Right]);
        for _ in 0..20 {
            assert_eq!(find_path(Cell::new(5, 5), Cell::new(7, 7), &map), path);
        }
    }

    #[test]
    fn routes_around_a_wall_segment() {
        let walls = [Cell::new(4, 5), Cell::new(5, 5), Cell::new(6, 5)];
        let map = ObstacleMap::from_walls(&walls);
        let start = Cell::new(5, 4);
        let goal = Cell::new(5, 6);
        let path = find_path(start, goal, &map);
        assert_eq!(path.len(), 6);
        assert_eq!(walk(start, &path, &map), Some(goal));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let goal = Cell::new(4, 4);
        let walls: Vec<Cell> = Move::ALL.iter().map(|mv| goal.step(*mv)).collect();
        let map = ObstacleMap::from_walls(&walls);
        assert!(find_path(Cell::new(0, 0), goal, &map).is_empty());
    }

    #[test]
    fn walled_goal_is_unreachable() {
        let map = ObstacleMap::from_walls(&[Cell::new(2, 2)]);
        assert!(find_path(Cell::new(0, 0), Cell::new(2, 2), &map).is_empty());
    }

    #[test]
    fn corner_goal_behind_diagonal_wall_is_unreachable() {
        let map = ObstacleMap::from_walls(&[Cell::new(0, 1), Cell::new(1, 0)]);
        assert!(find_path(Cell::new(5, 5), Cell::new(0, 0), &map).is_empty());
        assert!(find_path(Cell::new(0, 0), Cell::new(5, 5), &map).is_empty());
    }

    #[test]
    fn off_board_goal_is_unreachable() {
        let map = ObstacleMap::open();
        assert!(find_path(Cell::new(0, 0), Cell::new(0, 10), &map).is_empty());
    }

    #[test]
    fn path_length_matches_reference_distance_on_random_boards() {
        for (seed, density) in [(1u64, 0.0), (2, 0.1), (3, 0.2), (4, 0.3), (5, 0.35), (6, 0.45)] {
            let map = ObstacleMap::from_walls(&random_walls(seed, density));
            let reference = all_pairs_distances(&map);

            for start in all_cells().filter(|cell| map.is_passable(*cell)) {
                for goal in all_cells() {
                    let expected = reference[start.index().unwrap()][goal.index().unwrap()];
                    let path = find_path(start, goal, &map);
                    if expected == UNREACHABLE || expected == 0 {
                        assert!(
                            path.is_empty(),
                            "seed={seed} start={start} goal={goal} expected no moves"
                        );
                        continue;
                    }
                    assert_eq!(
                        path.len() as u32,
                        expected,
                        "seed={seed} start={start} goal={goal}"
                    );
                    assert_eq!(walk(start, &path, &map), Some(goal));
                }
            }
        }
    }
}
