//! The fork pool.
//!
//! Each fork is a `Mutex<Option<AgentId>>` recording its holder plus a
//! `Condvar` signalled on release. Possession is strictly binary and not
//! reentrant. Wake order is whatever the platform condvar gives; there is
//! no fairness guarantee and a slow agent can starve.

use std::error::Error;
use std::fmt;
use std::sync::{Condvar, Mutex};

use dine_core::{AgentId, ForkId};
use tracing::trace;

/// Errors from the fork pool.
///
/// None of these are part of normal contention (blocking is how waiting
/// works); each one means a broken protocol or a broken primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A pool with zero forks was requested.
    Empty,
    /// The fork id is outside the pool.
    UnknownFork {
        /// The offending id.
        fork: ForkId,
        /// Number of forks in the pool.
        len: usize,
    },
    /// The agent already holds the fork it is trying to acquire.
    Reentrant {
        /// The fork.
        fork: ForkId,
        /// The agent holding it.
        agent: AgentId,
    },
    /// The agent released a fork it does not hold.
    NotHolder {
        /// The fork.
        fork: ForkId,
        /// The releasing agent.
        agent: AgentId,
        /// Who actually holds it, if anyone.
        holder: Option<AgentId>,
    },
    /// The fork's lock was poisoned by a panicking thread.
    Poisoned {
        /// The fork.
        fork: ForkId,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "fork pool must hold at least one fork"),
            Self::UnknownFork { fork, len } => {
                write!(f, "fork {fork} not in pool of {len}")
            }
            Self::Reentrant { fork, agent } => {
                write!(f, "agent {agent} already holds fork {fork}")
            }
            Self::NotHolder {
                fork,
                agent,
                holder: Some(holder),
            } => write!(
                f,
                "agent {agent} released fork {fork} held by agent {holder}"
            ),
            Self::NotHolder {
                fork,
                agent,
                holder: None,
            } => write!(f, "agent {agent} released free fork {fork}"),
            Self::Poisoned { fork } => write!(f, "fork {fork} lock poisoned"),
        }
    }
}

impl Error for PoolError {}

struct Fork {
    holder: Mutex<Option<AgentId>>,
    freed: Condvar,
}

impl Fork {
    fn new() -> Self {
        Self {
            holder: Mutex::new(None),
            freed: Condvar::new(),
        }
    }
}

/// A fixed set of forks, all free at construction.
pub struct ForkPool {
    forks: Box<[Fork]>,
}

// Compile-time assertion: workers share the pool by reference.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<ForkPool>();
};

impl ForkPool {
    /// Create `count` free forks.
    pub fn new(count: usize) -> Result<Self, PoolError> {
        if count == 0 {
            return Err(PoolError::Empty);
        }
        Ok(Self {
            forks: (0..count).map(|_| Fork::new()).collect(),
        })
    }

    /// Number of forks.
    pub fn len(&self) -> usize {
        self.forks.len()
    }

    /// Always `false`: construction rejects an empty pool.
    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    fn slot(&self, fork: ForkId) -> Result<&Fork, PoolError> {
        self.forks.get(fork.index()).ok_or(PoolError::UnknownFork {
            fork,
            len: self.forks.len(),
        })
    }

    /// Block until `fork` is free, then give it to `agent`.
    pub fn acquire(&self, fork: ForkId, agent: AgentId) -> Result<(), PoolError> {
        let slot = self.slot(fork)?;
        let holder = slot
            .holder
            .lock()
            .map_err(|_| PoolError::Poisoned { fork })?;
        if *holder == Some(agent) {
            return Err(PoolError::Reentrant { fork, agent });
        }
        let mut holder = slot
            .freed
            .wait_while(holder, |h| h.is_some())
            .map_err(|_| PoolError::Poisoned { fork })?;
        *holder = Some(agent);
        trace!(%fork, %agent, "fork acquired");
        Ok(())
    }

    /// Give up `fork`, waking at most one waiter.
    pub fn release(&self, fork: ForkId, agent: AgentId) -> Result<(), PoolError> {
        let slot = self.slot(fork)?;
        let mut holder = slot
            .holder
            .lock()
            .map_err(|_| PoolError::Poisoned { fork })?;
        if *holder != Some(agent) {
            return Err(PoolError::NotHolder {
                fork,
                agent,
                holder: *holder,
            });
        }
        *holder = None;
        drop(holder);
        slot.freed.notify_one();
        trace!(%fork, %agent, "fork released");
        Ok(())
    }

    /// Current holder of `fork`.
    pub fn holder(&self, fork: ForkId) -> Result<Option<AgentId>, PoolError> {
        let slot = self.slot(fork)?;
        let holder = slot
            .holder
            .lock()
            .map_err(|_| PoolError::Poisoned { fork })?;
        Ok(*holder)
    }

    /// Number of forks currently held by some agent.
    pub fn held_count(&self) -> Result<usize, PoolError> {
        let mut held = 0;
        for i in 0..self.forks.len() {
            if self.holder(ForkId(i as u32))?.is_some() {
                held += 1;
            }
        }
        Ok(held)
    }
}

impl fmt::Debug for ForkPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForkPool")
            .field("forks", &self.forks.len())
            .finish()
    }
}
