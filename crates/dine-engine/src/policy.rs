//! Fork acquisition order.
//!
//! Agents pick up their two forks one at a time, so the order matters: if
//! every agent grabbed the same side first, all of them could hold one
//! fork and wait forever for the other.
//!
//! A wait cycle on a ring must run all the way around it (two neighbours
//! cannot wait on each other: each waits for its second fork, and they
//! share at most one fork, which one of them already holds as its first).
//! A full-ring cycle needs every agent to hold its first fork at once,
//! which needs the first-fork choices to be pairwise distinct.
//! [`circular_wait_possible`] checks exactly that, and
//! [`AcquisitionPolicy::verify`] runs it for a concrete table size.

use std::error::Error;
use std::fmt;

use dine_core::{AgentId, ForkId, Ring, Side};

/// How an agent orders its two fork requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AcquisitionPolicy {
    /// Even seats take their right fork first, odd seats their left.
    /// Agents 0 and 1 both start with fork 1, so the first-fork choices
    /// always collide.
    #[default]
    Parity,
    /// Every agent takes its lower-numbered fork first. The last seat and
    /// seat 0 both start with fork 0.
    LowerFirst,
}

impl AcquisitionPolicy {
    /// Short name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Parity => "parity",
            Self::LowerFirst => "lower-first",
        }
    }

    /// `[first, second]` sides for `agent`.
    pub fn order(self, ring: &Ring, agent: AgentId) -> [Side; 2] {
        let first = match self {
            Self::Parity => {
                if agent.is_even() {
                    Side::Right
                } else {
                    Side::Left
                }
            }
            Self::LowerFirst => {
                if ring.left_fork(agent) < ring.right_fork(agent) {
                    Side::Left
                } else {
                    Side::Right
                }
            }
        };
        [first, first.other()]
    }

    /// The fork `agent` requests first.
    pub fn first_fork(self, ring: &Ring, agent: AgentId) -> ForkId {
        ring.fork(agent, self.order(ring, agent)[0])
    }

    /// Check that this policy rules out a circular wait on `ring`.
    pub fn verify(self, ring: &Ring) -> Result<(), PolicyError> {
        if circular_wait_possible(ring, |agent| self.first_fork(ring, agent)) {
            return Err(PolicyError::CircularWait {
                policy: self.name(),
                agents: ring.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for AcquisitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether every agent could hold its first fork at the same time.
///
/// `first` maps each agent to the fork it requests first. Returns `true`
/// when those forks are pairwise distinct.
pub fn circular_wait_possible(ring: &Ring, first: impl Fn(AgentId) -> ForkId) -> bool {
    let mut claimed = vec![false; ring.len() as usize];
    for agent in ring.agents() {
        let fork = first(agent);
        match claimed.get_mut(fork.index()) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// A policy that fails verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyError {
    /// Every agent could hold its first fork at once and wait forever.
    CircularWait {
        /// Name of the policy.
        policy: &'static str,
        /// Table size it was checked against.
        agents: u32,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircularWait { policy, agents } => write!(
                f,
                "policy '{policy}' admits a circular wait with {agents} agents"
            ),
        }
    }
}

impl Error for PolicyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parity_orders_by_seat_number() {
        let ring = Ring::new(5).unwrap();
        assert_eq!(
            AcquisitionPolicy::Parity.order(&ring, AgentId(0)),
            [Side::Right, Side::Left]
        );
        assert_eq!(
            AcquisitionPolicy::Parity.order(&ring, AgentId(3)),
            [Side::Left, Side::Right]
        );
        // Seat 4 is even: right fork first, which wraps to fork 0.
        assert_eq!(
            AcquisitionPolicy::Parity.first_fork(&ring, AgentId(4)),
            ForkId(0)
        );
    }

    #[test]
    fn lower_first_flips_for_last_seat() {
        let ring = Ring::new(5).unwrap();
        assert_eq!(
            AcquisitionPolicy::LowerFirst.first_fork(&ring, AgentId(2)),
            ForkId(2)
        );
        assert_eq!(
            AcquisitionPolicy::LowerFirst.order(&ring, AgentId(4)),
            [Side::Right, Side::Left]
        );
    }

    #[test]
    fn everyone_left_first_admits_circular_wait() {
        let ring = Ring::new(5).unwrap();
        assert!(circular_wait_possible(&ring, |a| ring.left_fork(a)));
        assert!(circular_wait_possible(&ring, |a| ring.right_fork(a)));
    }

    #[test]
    fn out_of_range_first_fork_is_not_a_cycle() {
        let ring = Ring::new(3).unwrap();
        assert!(!circular_wait_possible(&ring, |_| ForkId(9)));
    }

    #[test]
    fn both_policies_verify_on_two_seats() {
        let ring = Ring::new(2).unwrap();
        assert!(AcquisitionPolicy::Parity.verify(&ring).is_ok());
        assert!(AcquisitionPolicy::LowerFirst.verify(&ring).is_ok());
    }

    #[test]
    fn error_names_policy_and_size() {
        let msg = PolicyError::CircularWait {
            policy: "parity",
            agents: 7,
        }
        .to_string();
        assert!(msg.contains("parity"));
        assert!(msg.contains('7'));
    }

    proptest! {
        #[test]
        fn parity_is_deadlock_free_for_every_size(len in 2u32..=Ring::MAX_AGENTS) {
            let ring = Ring::new(len).unwrap();
            prop_assert!(AcquisitionPolicy::Parity.verify(&ring).is_ok());
        }

        #[test]
        fn lower_first_is_deadlock_free_for_every_size(len in 2u32..=Ring::MAX_AGENTS) {
            let ring = Ring::new(len).unwrap();
            prop_assert!(AcquisitionPolicy::LowerFirst.verify(&ring).is_ok());
        }

        #[test]
        fn second_fork_is_the_other_one(len in 2u32..64, seat in 0u32..64) {
            let ring = Ring::new(len).unwrap();
            let agent = AgentId(seat % len);
            for policy in [AcquisitionPolicy::Parity, AcquisitionPolicy::LowerFirst] {
                let [first, second] = policy.order(&ring, agent);
                prop_assert_ne!(ring.fork(agent, first), ring.fork(agent, second));
            }
        }
    }
}
