use std::time::{SystemTime, UNIX_EPOCH};

use crate::rng::{derive_seed, SplitMix64};

/// Per-invocation input supplied by the host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    /// Monotonic cycle index (logging, telemetry, rng derivation).
    pub cycle: u64,
    /// Wall clock in whole seconds; action timeouts are measured against it.
    pub now_secs: u64,
    pub seed: u64,
}

impl TickContext {
    pub fn new(cycle: u64, now_secs: u64, seed: u64) -> Self {
        Self {
            cycle,
            now_secs,
            seed,
        }
    }

    /// Context stamped with the current system time.
    pub fn wall_clock(cycle: u64, seed: u64) -> Self {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::new(cycle, now_secs, seed)
    }

    pub fn rng(&self, stream: u64) -> SplitMix64 {
        SplitMix64::new(derive_seed(self.seed, self.cycle, stream))
    }
}
