use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The single source of randomness for a battle.
///
/// Every roll the engine makes (ordering ties, hit and critical checks,
/// damage variance, status procs and durations) goes through one of these,
/// so a fixed source replays a battle exactly.
pub trait BattleRng {
    /// Uniform integer in `min..=max`. `reason` is for diagnostics only.
    fn range_inclusive(&mut self, min: u32, max: u32, reason: &str) -> u32;

    fn coin_flip(&mut self, reason: &str) -> bool {
        self.range_inclusive(0, 1, reason) == 1
    }

    fn roll_percent(&mut self, reason: &str) -> u32 {
        self.range_inclusive(1, 100, reason)
    }

    fn roll_permille(&mut self, reason: &str) -> u32 {
        self.range_inclusive(1, 1000, reason)
    }

    /// Uniform index into a collection of `len` elements. `len` must be positive.
    fn index(&mut self, len: usize, reason: &str) -> usize {
        let max = u32::try_from(len.saturating_sub(1)).unwrap_or(u32::MAX);
        self.range_inclusive(0, max, reason) as usize
    }
}

/// `StdRng` seeded from a known value so any battle can be replayed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    initial_seed: u64,
    rng: StdRng,
}

impl SeededRng {
    /// Seeds from `seed`, or from fresh entropy when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let initial_seed = seed.unwrap_or_else(|| rand::rng().random());
        Self {
            initial_seed,
            rng: StdRng::seed_from_u64(initial_seed),
        }
    }

    pub fn initial_seed(&self) -> u64 {
        self.initial_seed
    }
}

impl BattleRng for SeededRng {
    fn range_inclusive(&mut self, min: u32, max: u32, reason: &str) -> u32 {
        let value = if min >= max {
            min
        } else {
            self.rng.random_range(min..=max)
        };
        tracing::trace!(value, min, max, reason, "rng draw");
        value
    }
}

/// Replays a fixed script of outcomes, mainly for tests.
///
/// Each outcome is clamped into the range requested by the draw, so `1`
/// always passes a percent or permille check and `1000` always fails one.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<u32>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<u32>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Outcomes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.outcomes.len().saturating_sub(self.index)
    }
}

impl BattleRng for ScriptedRng {
    fn range_inclusive(&mut self, min: u32, max: u32, reason: &str) -> u32 {
        let Some(outcome) = self.outcomes.get(self.index) else {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more scripted values.",
                reason
            );
        };
        self.index += 1;
        let value = (*outcome).clamp(min, max.max(min));
        tracing::trace!(value, min, max, reason, "scripted rng draw");
        value
    }
}
