//! Per-run statistics.
//!
//! [`AgentReport`] is filled in by each worker as it runs and handed back
//! when its thread is joined. [`DinnerReport`] gathers them with the
//! dispatcher's own counters.

use std::time::Duration;

use dine_core::AgentId;

/// What one agent did during a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentReport {
    /// The agent.
    pub agent: AgentId,
    /// Number of times it started eating.
    pub meals: u32,
    /// Total time from turning hungry to holding both forks.
    pub total_wait: Duration,
    /// Longest single wait from hungry to eating.
    pub max_wait: Duration,
    /// Pauses that ended early.
    pub interrupted_delays: u32,
}

impl AgentReport {
    /// Empty report for `agent`.
    pub fn new(agent: AgentId) -> Self {
        Self {
            agent,
            meals: 0,
            total_wait: Duration::ZERO,
            max_wait: Duration::ZERO,
            interrupted_delays: 0,
        }
    }

    /// Record one hungry-to-eating wait.
    pub fn record_meal(&mut self, wait: Duration) {
        self.meals += 1;
        self.total_wait += wait;
        self.max_wait = self.max_wait.max(wait);
    }

    /// Mean wait per meal, or zero before the first meal.
    pub fn mean_wait(&self) -> Duration {
        if self.meals == 0 {
            Duration::ZERO
        } else {
            self.total_wait / self.meals
        }
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DinnerReport {
    /// One entry per agent, in seat order.
    pub agents: Vec<AgentReport>,
    /// Wall time from table setup to the last join.
    pub elapsed: Duration,
    /// Table snapshots published.
    pub snapshots: u64,
}

impl DinnerReport {
    /// Meals across all agents.
    pub fn total_meals(&self) -> u64 {
        self.agents.iter().map(|a| u64::from(a.meals)).sum()
    }

    /// Interrupted pauses across all agents.
    pub fn interrupted_delays(&self) -> u64 {
        self.agents
            .iter()
            .map(|a| u64::from(a.interrupted_delays))
            .sum()
    }

    /// Longest hungry-to-eating wait of any agent.
    pub fn max_wait(&self) -> Duration {
        self.agents
            .iter()
            .map(|a| a.max_wait)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
