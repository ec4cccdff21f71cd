//! Per-agent table records and the events that move them.
//!
//! A record only changes through [`AgentRecord::apply`], which checks the
//! event against the current state before touching any field. A rejected
//! event leaves the record exactly as it was.

use std::fmt;

use crate::error::TableError;
use crate::id::AgentId;
use crate::ring::Side;

/// Visible phase of an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Idle, needs no forks.
    Thinking,
    /// Wants to eat; collecting forks.
    Hungry,
    /// Holding both forks.
    Eating,
}

impl AgentState {
    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Thinking => "Think",
            Self::Hungry => "Hungry",
            Self::Eating => "Eat",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One step of the worker protocol, as recorded on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableEvent {
    /// Thinking → Hungry. Requires a repetition left and empty hands.
    Hungry,
    /// Hungry agent picked up its first fork.
    PickedUp(Side),
    /// Hungry agent picked up its second fork and started eating.
    StartedEating(Side),
    /// Eating agent put down its second fork and went back to thinking.
    FinishedEating(Side),
    /// Thinking agent put down its remaining fork.
    PutDown(Side),
    /// Thinking agent with empty hands finished one repetition.
    RepetitionDone,
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hungry => write!(f, "hungry"),
            Self::PickedUp(side) => write!(f, "picked up {side:?} fork"),
            Self::StartedEating(side) => write!(f, "picked up {side:?} fork and started eating"),
            Self::FinishedEating(side) => write!(f, "put down {side:?} fork and stopped eating"),
            Self::PutDown(side) => write!(f, "put down {side:?} fork"),
            Self::RepetitionDone => write!(f, "finished a repetition"),
        }
    }
}

/// Visible state of one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentRecord {
    /// Seat of this agent.
    pub id: AgentId,
    /// Current phase.
    pub state: AgentState,
    /// Whether the agent holds its left fork.
    pub holds_left: bool,
    /// Whether the agent holds its right fork.
    pub holds_right: bool,
    /// Repetitions still to complete.
    pub remaining: u32,
}

impl AgentRecord {
    /// A thinking agent with empty hands and `repetitions` cycles to run.
    pub fn new(id: AgentId, repetitions: u32) -> Self {
        Self {
            id,
            state: AgentState::Thinking,
            holds_left: false,
            holds_right: false,
            remaining: repetitions,
        }
    }

    /// Whether the agent holds the fork on `side`.
    pub fn holds(&self, side: Side) -> bool {
        match side {
            Side::Left => self.holds_left,
            Side::Right => self.holds_right,
        }
    }

    /// Whether the agent holds both forks.
    pub fn holds_both(&self) -> bool {
        self.holds_left && self.holds_right
    }

    /// Whether the agent holds no fork.
    pub fn is_empty_handed(&self) -> bool {
        !self.holds_left && !self.holds_right
    }

    fn set_holds(&mut self, side: Side, held: bool) {
        match side {
            Side::Left => self.holds_left = held,
            Side::Right => self.holds_right = held,
        }
    }

    /// Apply `event`, or reject it without changing anything.
    pub fn apply(&mut self, event: TableEvent) -> Result<(), TableError> {
        use AgentState::*;

        let legal = match event {
            TableEvent::Hungry => {
                self.state == Thinking && self.is_empty_handed() && self.remaining > 0
            }
            TableEvent::PickedUp(_) => self.state == Hungry && self.is_empty_handed(),
            TableEvent::StartedEating(side) => {
                self.state == Hungry && !self.holds(side) && self.holds(side.other())
            }
            TableEvent::FinishedEating(_) => self.state == Eating && self.holds_both(),
            TableEvent::PutDown(side) => {
                self.state == Thinking && self.holds(side) && !self.holds(side.other())
            }
            TableEvent::RepetitionDone => {
                self.state == Thinking && self.is_empty_handed() && self.remaining > 0
            }
        };
        if !legal {
            return Err(TableError::IllegalTransition {
                agent: self.id,
                state: self.state,
                event,
            });
        }

        match event {
            TableEvent::Hungry => self.state = Hungry,
            TableEvent::PickedUp(side) => self.set_holds(side, true),
            TableEvent::StartedEating(side) => {
                self.set_holds(side, true);
                self.state = Eating;
            }
            TableEvent::FinishedEating(side) => {
                self.set_holds(side, false);
                self.state = Thinking;
            }
            TableEvent::PutDown(side) => self.set_holds(side, false),
            TableEvent::RepetitionDone => self.remaining -= 1,
        }
        Ok(())
    }
}
