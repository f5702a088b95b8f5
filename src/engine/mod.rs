use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{BoardSnapshot, Decision, DecisionState, TargetKind};

pub mod fallback;
pub mod grid;
pub mod pathfinding;
pub mod targeting;
mod utils;

pub use self::fallback::FallbackCoins;
pub use self::grid::ObstacleMap;
pub use self::pathfinding::find_path;
pub use self::targeting::select_target;

use self::utils::random_move;

/// Runs one decision cycle.
///
/// Consumes the fallback set and hands back its successor so the caller
/// decides where cross-cycle state lives. Everything else is rebuilt from
/// `snapshot`.
pub fn decide<R: Rng>(
    snapshot: &BoardSnapshot,
    mut fallback: FallbackCoins,
    rng: &mut R,
) -> (Decision, FallbackCoins) {
    let current = snapshot.current_position;
    let map = ObstacleMap::from_walls(&snapshot.wall_positions);

    let Some(target) = select_target(current, &snapshot.coin_positions, &fallback) else {
        let decision = Decision {
            mv: random_move(rng),
            state: DecisionState::NoTarget,
            target: None,
            path_len: 0,
        };
        return (decision, fallback);
    };

    let path = find_path(current, target.cell, &map);
    let decision = match path.first() {
        Some(first) => Decision {
            mv: *first,
            state: DecisionState::HasPath,
            target: Some(target),
            path_len: path.len(),
        },
        None => Decision {
            mv: random_move(rng),
            state: DecisionState::NoPath,
            target: Some(target),
            path_len: 0,
        },
    };

    if target.kind == TargetKind::Fallback && fallback.prune_near(current, target.cell) {
        tracing::debug!(coin = %target.cell, remaining = fallback.len(), "fallback coin pruned");
    }

    (decision, fallback)
}

/// Owns the only state that outlives a cycle: the fallback set and the
/// random source for undirected moves.
#[derive(Clone, Debug)]
pub struct MoveDecisionEngine {
    fallback: FallbackCoins,
    rng: StdRng,
    cycles: u64,
}

impl MoveDecisionEngine {
    pub fn new() -> Self {
        Self::with_parts(FallbackCoins::seeded(), StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(FallbackCoins::seeded(), StdRng::seed_from_u64(seed))
    }

    pub fn with_parts(fallback: FallbackCoins, rng: StdRng) -> Self {
        Self {
            fallback,
            rng,
            cycles: 0,
        }
    }

    pub fn on_snapshot(&mut self, snapshot: &BoardSnapshot) -> Decision {
        let had_fallback = !self.fallback.is_empty();
        let fallback = std::mem::take(&mut self.fallback);
        let (decision, fallback) = decide(snapshot, fallback, &mut self.rng);
        self.fallback = fallback;
        self.cycles += 1;
        if had_fallback && self.fallback.is_empty() {
            tracing::info!(cycle = self.cycles, "fallback coins exhausted");
        }
        tracing::debug!(
            cycle = self.cycles,
            position = %snapshot.current_position,
            state = ?decision.state,
            goal = ?decision.target,
            mv = %decision.mv,
            "decision made"
        );
        decision
    }

    pub fn fallback(&self) -> &FallbackCoins {
        &self.fallback
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

impl Default for MoveDecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}
