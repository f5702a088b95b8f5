use rand::Rng;

use crate::types::Move;

pub(super) fn random_move<R: Rng>(rng: &mut R) -> Move {
    Move::ALL[rng.random_range(0..Move::ALL.len())]
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_direction_is_drawn_with_similar_frequency() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 4];
        for _ in 0..4_000 {
            let mv = random_move(&mut rng);
            let idx = Move::ALL.iter().position(|m| *m == mv).unwrap();
            counts[idx] += 1;
        }
        for count in counts {
            assert!((800..=1_200).contains(&count), "skewed counts: {counts:?}");
        }
    }
}
