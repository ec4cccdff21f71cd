//! Error types for the dining table core.
//!
//! Organized by subsystem: ring construction, table record mutation, and
//! snapshot invariant checking.

use std::error::Error;
use std::fmt;

use crate::id::{AgentId, ForkId};
use crate::record::{AgentState, TableEvent};

/// Errors from [`Ring::new`](crate::Ring::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// Fewer than two seats. A lone agent's left and right fork coincide.
    TooFewAgents {
        /// The requested seat count.
        len: u32,
    },
    /// More seats than the table supports.
    TooManyAgents {
        /// The requested seat count.
        len: u32,
        /// The supported maximum.
        max: u32,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewAgents { len } => {
                write!(f, "a table needs at least 2 agents, got {len}")
            }
            Self::TooManyAgents { len, max } => {
                write!(f, "a table holds at most {max} agents, got {len}")
            }
        }
    }
}

impl Error for TopologyError {}

/// Errors from applying a [`TableEvent`] to the shared table.
///
/// Every variant means the worker protocol was broken; callers treat it
/// as fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableError {
    /// The agent id does not index a record in the table.
    UnknownAgent {
        /// The offending id.
        agent: AgentId,
        /// Number of records in the table.
        len: usize,
    },
    /// The event is not legal from the record's current state.
    IllegalTransition {
        /// The agent whose record rejected the event.
        agent: AgentId,
        /// The record's state when the event arrived.
        state: AgentState,
        /// The rejected event.
        event: TableEvent,
    },
    /// The global update lock was poisoned by a panicking holder.
    LockPoisoned,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAgent { agent, len } => {
                write!(f, "agent {agent} not in table of {len}")
            }
            Self::IllegalTransition {
                agent,
                state,
                event,
            } => write!(f, "agent {agent}: illegal event {event} while {state}"),
            Self::LockPoisoned => write!(f, "table update lock poisoned"),
        }
    }
}

impl Error for TableError {}

/// A table snapshot that breaks one of the safety invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Both agents sharing a fork claim to hold it.
    ForkContended {
        /// The doubly-held fork.
        fork: ForkId,
        /// The two claimants.
        holders: [AgentId; 2],
    },
    /// An agent holds both forks without being in the Eating state.
    BothForksOutsideEating {
        /// The offending agent.
        agent: AgentId,
        /// Its state at the time.
        state: AgentState,
    },
    /// An agent is Eating without holding both forks.
    EatingWithoutForks {
        /// The offending agent.
        agent: AgentId,
    },
    /// Two circularly-adjacent agents are Eating at once.
    AdjacentEating {
        /// One eater.
        a: AgentId,
        /// Its neighbour.
        b: AgentId,
    },
    /// The record at position `index` carries a different id.
    MisplacedRecord {
        /// Position in the table.
        index: usize,
        /// Id found there.
        found: AgentId,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForkContended { fork, holders } => write!(
                f,
                "fork {fork} held by both agent {} and agent {}",
                holders[0], holders[1]
            ),
            Self::BothForksOutsideEating { agent, state } => {
                write!(f, "agent {agent} holds both forks while {state}")
            }
            Self::EatingWithoutForks { agent } => {
                write!(f, "agent {agent} eating without both forks")
            }
            Self::AdjacentEating { a, b } => {
                write!(f, "adjacent agents {a} and {b} eating at once")
            }
            Self::MisplacedRecord { index, found } => {
                write!(f, "record {index} carries id {found}")
            }
        }
    }
}

impl Error for InvariantViolation {}
