//! Read-only views over the agent table.

use smallvec::SmallVec;

use crate::error::InvariantViolation;
use crate::id::{AgentId, ForkId};
use crate::record::{AgentRecord, AgentState};
use crate::ring::Ring;

/// A consistent, borrowed snapshot of every agent record.
///
/// Observers receive one of these while the table's update lock is held,
/// so every record in it is fully updated. Record `i` belongs to
/// `AgentId(i)`; agent `i`'s left fork is fork `i` and its right fork is
/// fork `(i + 1) % len`.
#[derive(Clone, Copy, Debug)]
pub struct TableView<'a> {
    records: &'a [AgentRecord],
}

impl<'a> TableView<'a> {
    /// Wrap a record slice indexed by agent id.
    pub fn new(records: &'a [AgentRecord]) -> Self {
        Self { records }
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no agents.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The underlying records.
    pub fn records(&self) -> &'a [AgentRecord] {
        self.records
    }

    /// Record of `agent`, if seated.
    pub fn get(&self, agent: AgentId) -> Option<&'a AgentRecord> {
        self.records.get(agent.index())
    }

    /// Iterate the records in seat order.
    pub fn iter(&self) -> std::slice::Iter<'a, AgentRecord> {
        self.records.iter()
    }

    /// Agents whose record claims `fork`.
    ///
    /// At most one entry in any consistent snapshot.
    pub fn fork_holders(&self, fork: ForkId) -> SmallVec<[AgentId; 2]> {
        let mut out = SmallVec::new();
        let Some(ring) = self.ring() else {
            return out;
        };
        if fork.index() >= self.records.len() {
            return out;
        }
        let [left_user, right_user] = ring.users(fork);
        if self.records[left_user.index()].holds_left {
            out.push(left_user);
        }
        if self.records[right_user.index()].holds_right {
            out.push(right_user);
        }
        out
    }

    /// Whether any record claims `fork`.
    pub fn fork_held(&self, fork: ForkId) -> bool {
        !self.fork_holders(fork).is_empty()
    }

    /// Number of agents currently Eating.
    pub fn eating_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.state == AgentState::Eating)
            .count()
    }

    /// Check every safety invariant, returning the first violation found.
    ///
    /// - each fork is claimed by at most one agent;
    /// - an agent holds both forks exactly when it is Eating;
    /// - no two circularly-adjacent agents are Eating.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let n = self.records.len();
        for (index, rec) in self.records.iter().enumerate() {
            if rec.id.index() != index {
                return Err(InvariantViolation::MisplacedRecord {
                    index,
                    found: rec.id,
                });
            }
        }

        if let Some(ring) = self.ring() {
            for fork in ring.forks() {
                let holders = self.fork_holders(fork);
                if holders.len() > 1 {
                    return Err(InvariantViolation::ForkContended {
                        fork,
                        holders: [holders[0], holders[1]],
                    });
                }
            }
        }

        for rec in self.records {
            match (rec.state, rec.holds_both()) {
                (AgentState::Eating, false) => {
                    return Err(InvariantViolation::EatingWithoutForks { agent: rec.id });
                }
                (state, true) if state != AgentState::Eating => {
                    return Err(InvariantViolation::BothForksOutsideEating {
                        agent: rec.id,
                        state,
                    });
                }
                _ => {}
            }
        }

        for (i, rec) in self.records.iter().enumerate() {
            let next = &self.records[(i + 1) % n];
            if next.id != rec.id
                && rec.state == AgentState::Eating
                && next.state == AgentState::Eating
            {
                return Err(InvariantViolation::AdjacentEating {
                    a: rec.id,
                    b: next.id,
                });
            }
        }

        Ok(())
    }

    // `None` for tables no ring can seat, which hold no forks.
    fn ring(&self) -> Option<Ring> {
        u32::try_from(self.records.len())
            .ok()
            .and_then(|n| Ring::new(n).ok())
    }
}
