//! Randomized pauses between protocol steps.
//!
//! Each agent owns a [`Dawdle`] seeded from the run seed and its id, so
//! runs with the same seed draw the same pause lengths (thread scheduling
//! still varies). Pauses sleep by parking the thread; an early wake-up is
//! reported as [`DelayOutcome::Interrupted`] and the caller moves on.

use std::thread;
use std::time::{Duration, Instant};

use dine_core::AgentId;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// How a pause ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayOutcome {
    /// The thread slept for the full duration.
    Completed,
    /// The thread woke before the deadline.
    Interrupted {
        /// Time actually slept.
        slept: Duration,
        /// Time requested.
        requested: Duration,
    },
}

impl DelayOutcome {
    /// Whether the pause ended early.
    pub fn is_interrupted(self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Per-agent pause generator.
#[derive(Clone, Debug)]
pub struct Dawdle {
    bound_nanos: u64,
    rng: ChaCha8Rng,
}

impl Dawdle {
    /// Pauses drawn from `[0, bound)`. Bounds beyond `u64` nanoseconds
    /// are clamped.
    pub fn new(bound: Duration, seed: u64) -> Self {
        Self {
            bound_nanos: u64::try_from(bound.as_nanos()).unwrap_or(u64::MAX),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator for `agent`, derived from the run seed.
    pub fn for_agent(bound: Duration, seed: u64, agent: AgentId) -> Self {
        let mixed = seed ^ u64::from(agent.0).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self::new(bound, mixed)
    }

    /// Upper bound on a pause.
    pub fn bound(&self) -> Duration {
        Duration::from_nanos(self.bound_nanos)
    }

    /// Draw the next pause length without sleeping.
    pub fn next_delay(&mut self) -> Duration {
        if self.bound_nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.rng.random_range(0..self.bound_nanos))
    }

    /// Draw a pause length and sleep for it.
    pub fn pause(&mut self) -> DelayOutcome {
        let delay = self.next_delay();
        sleep(delay)
    }
}

/// Sleep for `requested` by parking the current thread.
///
/// Returns [`DelayOutcome::Interrupted`] if the thread is unparked (or
/// wakes spuriously) before the deadline. The remainder is not slept.
pub fn sleep(requested: Duration) -> DelayOutcome {
    if requested.is_zero() {
        return DelayOutcome::Completed;
    }
    let started = Instant::now();
    thread::park_timeout(requested);
    let slept = started.elapsed();
    if slept < requested {
        DelayOutcome::Interrupted { slept, requested }
    } else {
        DelayOutcome::Completed
    }
}
