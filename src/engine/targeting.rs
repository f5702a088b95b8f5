use crate::engine::fallback::FallbackCoins;
use crate::types::{Cell, Target, TargetKind};

/// Picks the coin to chase: the nearest observed coin if any exist,
/// otherwise the nearest fallback coin. Ties go to the earliest candidate.
pub fn select_target(
    current: Cell,
    real_coins: &[Cell],
    fallback: &FallbackCoins,
) -> Option<Target> {
    if let Some(cell) = nearest(current, real_coins.iter().copied()) {
        return Some(Target {
            cell,
            kind: TargetKind::Real,
        });
    }
    nearest(current, fallback.iter()).map(|cell| Target {
        cell,
        kind: TargetKind::Fallback,
    })
}

pub(crate) fn nearest(current: Cell, candidates: impl Iterator<Item = Cell>) -> Option<Cell> {
    candidates.min_by_key(|cell| current.manhattan(*cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_coins_take_priority_over_closer_fallback() {
        let fallback = FallbackCoins::seeded();
        let target = select_target(Cell::new(0, 1), &[Cell::new(9, 5)], &fallback);
        assert_eq!(
            target,
            Some(Target {
                cell: Cell::new(9, 5),
                kind: TargetKind::Real,
            })
        );
    }

    #[test]
    fn nearest_real_coin_is_chosen() {
        let fallback = FallbackCoins::seeded();
        let coins = [Cell::new(0, 0), Cell::new(5, 8), Cell::new(9, 9)];
        let target = select_target(Cell::new(5, 5), &coins, &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(5, 8));
    }

    #[test]
    fn equal_distance_keeps_input_order() {
        let fallback = FallbackCoins::seeded();
        let coins = [Cell::new(5, 7), Cell::new(5, 3), Cell::new(3, 5)];
        let target = select_target(Cell::new(5, 5), &coins, &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(5, 7));

        let reordered = [Cell::new(3, 5), Cell::new(5, 7), Cell::new(5, 3)];
        let target = select_target(Cell::new(5, 5), &reordered, &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(3, 5));
    }

    #[test]
    fn fallback_used_when_no_real_coins() {
        let fallback = FallbackCoins::seeded();
        let target = select_target(Cell::new(8, 1), &[], &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(9, 0));
        assert_eq!(target.kind, TargetKind::Fallback);
    }

    #[test]
    fn nearest_corner_is_chosen_from_seeded_set() {
        let fallback = FallbackCoins::seeded();
        let target = select_target(Cell::new(5, 5), &[], &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(9, 9));

        let target = select_target(Cell::new(4, 4), &[], &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(0, 0));
    }

    #[test]
    fn fallback_ties_follow_set_order() {
        let fallback = FallbackCoins::from_cells(vec![Cell::new(0, 6), Cell::new(0, 4)]);
        let target = select_target(Cell::new(0, 5), &[], &fallback).unwrap();
        assert_eq!(target.cell, Cell::new(0, 6));
    }

    #[test]
    fn no_target_when_everything_is_exhausted() {
        let fallback = FallbackCoins::from_cells(Vec::new());
        assert_eq!(select_target(Cell::new(5, 5), &[], &fallback), None);
    }

    #[test]
    fn selection_does_not_touch_fallback_set() {
        let fallback = FallbackCoins::seeded();
        let _ = select_target(Cell::new(0, 0), &[], &fallback);
        assert_eq!(fallback.len(), 4);
    }
}
