//! Benchmark profiles for the Dine simulation.
//!
//! Every profile disables pauses so a run measures locking and
//! bookkeeping, not sleeping:
//!
//! - [`reference_profile`]: 5 agents, 200 repetitions
//! - [`contention_profile`]: 2 agents fighting over both forks
//! - [`wide_profile`]: 64 agents, 20 repetitions

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::time::Duration;

use dine_engine::{AcquisitionPolicy, DinnerConfig};

/// The classic five-seat table, run long enough to dominate setup cost.
pub fn reference_profile(seed: u64, policy: AcquisitionPolicy) -> DinnerConfig {
    DinnerConfig {
        agents: 5,
        repetitions: 200,
        dawdle: Duration::ZERO,
        seed,
        policy,
    }
}

/// Two seats share both forks, so every meal is contended.
pub fn contention_profile(seed: u64) -> DinnerConfig {
    DinnerConfig {
        agents: 2,
        repetitions: 500,
        dawdle: Duration::ZERO,
        seed,
        policy: AcquisitionPolicy::Parity,
    }
}

/// A large table where most pairs of agents never interact.
pub fn wide_profile(seed: u64) -> DinnerConfig {
    DinnerConfig {
        agents: 64,
        repetitions: 20,
        dawdle: Duration::ZERO,
        seed,
        policy: AcquisitionPolicy::Parity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        for config in [
            reference_profile(1, AcquisitionPolicy::Parity),
            reference_profile(1, AcquisitionPolicy::LowerFirst),
            contention_profile(2),
            wide_profile(3),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
            assert!(config.dawdle.is_zero());
        }
    }
}
