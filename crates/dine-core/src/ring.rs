//! Circular seating: which forks each agent needs and who shares them.

use crate::error::TopologyError;
use crate::id::{AgentId, ForkId};
use smallvec::SmallVec;

/// Which of an agent's two forks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The fork with the same number as the agent.
    Left,
    /// The fork numbered one past the agent, wrapping at the ring size.
    Right,
}

impl Side {
    /// The other fork of the same agent.
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A ring of `len` agents and `len` forks.
///
/// Agent `i` uses fork `i` on its left and fork `(i + 1) % len` on its
/// right, so every fork is shared by exactly two circularly-adjacent agents.
///
/// # Examples
///
/// ```
/// use dine_core::{AgentId, ForkId, Ring, Side};
///
/// let ring = Ring::new(5).unwrap();
/// assert_eq!(ring.fork(AgentId(4), Side::Left), ForkId(4));
/// assert_eq!(ring.fork(AgentId(4), Side::Right), ForkId(0));
///
/// // Fork 0 sits between agent 0 (its left) and agent 4 (its right).
/// assert_eq!(ring.users(ForkId(0)), [AgentId(0), AgentId(4)]);
/// assert!(ring.adjacent(AgentId(0), AgentId(4)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ring {
    len: u32,
}

impl Ring {
    /// Smallest table: with one agent both forks would be the same fork.
    pub const MIN_AGENTS: u32 = 2;

    /// Largest table. Every agent is an OS thread.
    pub const MAX_AGENTS: u32 = 1024;

    /// Create a ring with `len` seats.
    ///
    /// Returns `Err(TopologyError::TooFewAgents)` if `len < 2` and
    /// `Err(TopologyError::TooManyAgents)` if `len > MAX_AGENTS`.
    pub fn new(len: u32) -> Result<Self, TopologyError> {
        if len < Self::MIN_AGENTS {
            return Err(TopologyError::TooFewAgents { len });
        }
        if len > Self::MAX_AGENTS {
            return Err(TopologyError::TooManyAgents {
                len,
                max: Self::MAX_AGENTS,
            });
        }
        Ok(Self { len })
    }

    /// Number of seats (and forks).
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always returns `false`: construction rejects rings below two seats.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All agent ids in seat order.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> {
        (0..self.len).map(AgentId)
    }

    /// All fork ids in table order.
    pub fn forks(&self) -> impl Iterator<Item = ForkId> {
        (0..self.len).map(ForkId)
    }

    /// Whether `agent` has a seat at this table.
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.0 < self.len
    }

    /// The fork on the given side of `agent`.
    pub fn fork(&self, agent: AgentId, side: Side) -> ForkId {
        debug_assert!(self.contains(agent), "agent {agent} not seated");
        match side {
            Side::Left => ForkId(agent.0),
            Side::Right => ForkId((agent.0 + 1) % self.len),
        }
    }

    /// The fork on the left of `agent`.
    pub fn left_fork(&self, agent: AgentId) -> ForkId {
        self.fork(agent, Side::Left)
    }

    /// The fork on the right of `agent`.
    pub fn right_fork(&self, agent: AgentId) -> ForkId {
        self.fork(agent, Side::Right)
    }

    /// The two agents sharing `fork`: `[left user, right user]`.
    ///
    /// The left user has it as its left fork, the right user as its right.
    pub fn users(&self, fork: ForkId) -> [AgentId; 2] {
        debug_assert!(fork.0 < self.len, "fork {fork} not on table");
        [AgentId(fork.0), AgentId((fork.0 + self.len - 1) % self.len)]
    }

    /// Distinct circular neighbours of `agent` (one when `len == 2`).
    pub fn neighbours(&self, agent: AgentId) -> SmallVec<[AgentId; 2]> {
        let prev = AgentId((agent.0 + self.len - 1) % self.len);
        let next = AgentId((agent.0 + 1) % self.len);
        let mut out = SmallVec::new();
        out.push(prev);
        if next != prev {
            out.push(next);
        }
        out
    }

    /// Whether `a` and `b` sit next to each other (and so share a fork).
    pub fn adjacent(&self, a: AgentId, b: AgentId) -> bool {
        a != b && self.neighbours(a).contains(&b)
    }
}
