//! Strongly-typed identifiers for agents and forks.

use std::fmt;

/// Identifies an agent (a seat at the table).
///
/// Agents are numbered `0..N` around the ring. `AgentId(n)` sits between
/// `ForkId(n)` on its left and `ForkId((n + 1) % N)` on its right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Position of this agent in per-agent arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this agent has an even seat number.
    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a fork, the single-holder resource between two seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForkId(pub u32);

impl ForkId {
    /// Position of this fork in per-fork arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ForkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ForkId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
