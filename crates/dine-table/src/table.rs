//! The shared table: agent records behind one global update lock.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use dine_core::{AgentId, AgentRecord, Ring, TableError, TableEvent, TableObserver, TableView};

use crate::pool::{ForkPool, PoolError};

/// Every agent record plus the fork pool, shared by all workers.
///
/// Records change only through [`apply`](SharedTable::apply): the global
/// lock is taken, one record accepts one event, the observer sees the
/// whole table, and the lock is dropped before `apply` returns. Nothing
/// else ever holds the lock, and no method blocks while holding it apart
/// from the observer callback.
pub struct SharedTable<'o> {
    ring: Ring,
    records: Mutex<Box<[AgentRecord]>>,
    pool: ForkPool,
    observer: &'o dyn TableObserver,
    published: AtomicU64,
}

impl<'o> SharedTable<'o> {
    /// Seat one thinking agent per ring position, each with `repetitions`
    /// cycles to run, and lay out one free fork per seat.
    pub fn new(
        ring: Ring,
        repetitions: u32,
        observer: &'o dyn TableObserver,
    ) -> Result<Self, PoolError> {
        let pool = ForkPool::new(ring.len() as usize)?;
        let records: Box<[AgentRecord]> = ring
            .agents()
            .map(|id| AgentRecord::new(id, repetitions))
            .collect();
        Ok(Self {
            ring,
            records: Mutex::new(records),
            pool,
            observer,
            published: AtomicU64::new(0),
        })
    }

    /// Seating topology.
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// The fork pool.
    pub fn pool(&self) -> &ForkPool {
        &self.pool
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.ring.len() as usize
    }

    /// Always `false`: a ring has at least two seats.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Apply `event` to `agent`'s record and publish the new table.
    ///
    /// Returns the snapshot sequence number (1 for the first change).
    pub fn apply(&self, agent: AgentId, event: TableEvent) -> Result<u64, TableError> {
        if !self.ring.contains(agent) {
            return Err(TableError::UnknownAgent {
                agent,
                len: self.len(),
            });
        }
        let mut records = self.records.lock().map_err(|_| TableError::LockPoisoned)?;
        records[agent.index()].apply(event)?;
        let seq = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        self.observer.on_change(agent, event, TableView::new(&records));
        Ok(seq)
    }

    /// Run `f` over a consistent view of the table.
    pub fn with_view<R>(&self, f: impl FnOnce(TableView<'_>) -> R) -> Result<R, TableError> {
        let records = self.records.lock().map_err(|_| TableError::LockPoisoned)?;
        Ok(f(TableView::new(&records)))
    }

    /// Copy of every record.
    pub fn snapshot(&self) -> Result<Vec<AgentRecord>, TableError> {
        self.with_view(|view| view.records().to_vec())
    }

    /// Hand the current table to the observer's `on_start` hook.
    pub fn announce_start(&self) -> Result<(), TableError> {
        self.with_view(|view| self.observer.on_start(view))
    }

    /// Hand the current table to the observer's `on_finish` hook.
    pub fn announce_finish(&self) -> Result<(), TableError> {
        self.with_view(|view| self.observer.on_finish(view))
    }

    /// Number of snapshots published through [`apply`](Self::apply).
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for SharedTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTable")
            .field("agents", &self.ring.len())
            .field("pool", &self.pool)
            .field("published", &self.published())
            .finish()
    }
}
