//! Per-agent worker: the think/acquire/eat/release cycle.
//!
//! A worker owns everything it needs (its fork order, its pause
//! generator, its report) and borrows the shared table. It blocks only
//! inside `ForkPool::acquire` and inside pauses, never while the table
//! lock is held.
//!
//! Table flags trail the pool on pickup and lead it on put-down, so a
//! published snapshot never shows one fork in two hands.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use dine_core::{AgentId, ForkId, Side, TableError, TableEvent};
use dine_table::{PoolError, SharedTable};
use tracing::{debug, warn};

use crate::dawdle::{Dawdle, DelayOutcome};
use crate::metrics::AgentReport;
use crate::policy::AcquisitionPolicy;

/// Why a worker stopped before finishing its cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerError {
    /// A fork operation failed.
    Pool(PoolError),
    /// The table rejected an update.
    Table(TableError),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(e) => write!(f, "fork pool: {e}"),
            Self::Table(e) => write!(f, "table: {e}"),
        }
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool(e) => Some(e),
            Self::Table(e) => Some(e),
        }
    }
}

impl From<PoolError> for WorkerError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

impl From<TableError> for WorkerError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

#[derive(Clone, Copy, Debug)]
struct Grip {
    side: Side,
    fork: ForkId,
}

/// One agent's run loop.
pub(crate) struct Worker<'t, 'o> {
    agent: AgentId,
    first: Grip,
    second: Grip,
    repetitions: u32,
    table: &'t SharedTable<'o>,
    dawdle: Dawdle,
    report: AgentReport,
}

impl<'t, 'o> Worker<'t, 'o> {
    pub(crate) fn new(
        agent: AgentId,
        policy: AcquisitionPolicy,
        repetitions: u32,
        table: &'t SharedTable<'o>,
        dawdle: Dawdle,
    ) -> Self {
        let ring = table.ring();
        let [first, second] = policy.order(&ring, agent);
        Self {
            agent,
            first: Grip {
                side: first,
                fork: ring.fork(agent, first),
            },
            second: Grip {
                side: second,
                fork: ring.fork(agent, second),
            },
            repetitions,
            table,
            dawdle,
            report: AgentReport::new(agent),
        }
    }

    /// Run every cycle, then return what happened.
    ///
    /// On error, or if the thread unwinds, any fork still held is handed
    /// back to the pool so neighbours are not left waiting.
    pub(crate) fn run(mut self) -> Result<AgentReport, WorkerError> {
        debug!(
            agent = %self.agent,
            first = %self.first.fork,
            second = %self.second.fork,
            repetitions = self.repetitions,
            "worker started"
        );
        for _ in 0..self.repetitions {
            self.cycle()?;
        }
        debug!(agent = %self.agent, meals = self.report.meals, "worker finished");
        Ok(self.report.clone())
    }

    fn cycle(&mut self) -> Result<(), WorkerError> {
        let hungry_at = Instant::now();
        self.table.apply(self.agent, TableEvent::Hungry)?;

        self.table.pool().acquire(self.first.fork, self.agent)?;
        self.table
            .apply(self.agent, TableEvent::PickedUp(self.first.side))?;

        self.table.pool().acquire(self.second.fork, self.agent)?;
        self.table
            .apply(self.agent, TableEvent::StartedEating(self.second.side))?;
        self.report.record_meal(hungry_at.elapsed());

        self.pause("eating");

        self.table
            .apply(self.agent, TableEvent::FinishedEating(self.second.side))?;
        self.table.pool().release(self.second.fork, self.agent)?;

        self.table
            .apply(self.agent, TableEvent::PutDown(self.first.side))?;
        self.table.pool().release(self.first.fork, self.agent)?;

        self.pause("thinking");
        self.table.apply(self.agent, TableEvent::RepetitionDone)?;
        Ok(())
    }

    fn pause(&mut self, phase: &'static str) {
        if let DelayOutcome::Interrupted { slept, requested } = self.dawdle.pause() {
            warn!(
                agent = %self.agent,
                phase,
                ?slept,
                ?requested,
                "pause interrupted, continuing"
            );
            self.report.interrupted_delays += 1;
        }
    }
}

impl Drop for Worker<'_, '_> {
    fn drop(&mut self) {
        let pool = self.table.pool();
        for grip in [self.second, self.first] {
            if let Ok(Some(holder)) = pool.holder(grip.fork) {
                if holder == self.agent && pool.release(grip.fork, self.agent).is_ok() {
                    warn!(agent = %self.agent, fork = %grip.fork, "fork returned on abnormal exit");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dine_core::{AgentState, NoopObserver, Ring};
    use dine_test_utils::RecordingObserver;
    use std::thread;
    use std::time::Duration;

    fn still(agent: AgentId) -> Dawdle {
        Dawdle::for_agent(Duration::ZERO, 0, agent)
    }

    #[test]
    fn lone_worker_runs_the_full_protocol() {
        let observer = RecordingObserver::new();
        let table = SharedTable::new(Ring::new(3).unwrap(), 2, &observer).unwrap();
        let agent = AgentId(1);
        let worker = Worker::new(agent, AcquisitionPolicy::Parity, 2, &table, still(agent));
        let report = worker.run().unwrap();

        assert_eq!(report.meals, 2);
        let events: Vec<TableEvent> = observer.frames().iter().map(|f| f.event).collect();
        let one_cycle = [
            TableEvent::Hungry,
            TableEvent::PickedUp(Side::Left),
            TableEvent::StartedEating(Side::Right),
            TableEvent::FinishedEating(Side::Right),
            TableEvent::PutDown(Side::Left),
            TableEvent::RepetitionDone,
        ];
        assert_eq!(&events[..6], &one_cycle);
        assert_eq!(&events[6..], &one_cycle);

        let last = table.snapshot().unwrap();
        assert_eq!(last[1].remaining, 0);
        assert_eq!(last[1].state, AgentState::Thinking);
        assert_eq!(table.pool().held_count().unwrap(), 0);
    }

    #[test]
    fn even_worker_starts_on_the_right() {
        let observer = RecordingObserver::new();
        let table = SharedTable::new(Ring::new(4).unwrap(), 1, &observer).unwrap();
        let agent = AgentId(2);
        Worker::new(agent, AcquisitionPolicy::Parity, 1, &table, still(agent))
            .run()
            .unwrap();
        assert_eq!(
            observer.frames()[1].event,
            TableEvent::PickedUp(Side::Right)
        );
    }

    #[test]
    fn rejected_update_stops_the_worker() {
        let table = SharedTable::new(Ring::new(3).unwrap(), 1, &NoopObserver).unwrap();
        let agent = AgentId(0);
        // Already hungry, so the worker's first update is rejected.
        table.apply(agent, TableEvent::Hungry).unwrap();
        let worker = Worker::new(agent, AcquisitionPolicy::Parity, 1, &table, still(agent));
        let err = worker.run().unwrap_err();
        assert!(matches!(
            err,
            WorkerError::Table(TableError::IllegalTransition { .. })
        ));
        assert_eq!(table.pool().held_count().unwrap(), 0);
    }

    #[test]
    fn interrupted_pauses_are_counted_not_retried() {
        let table = SharedTable::new(Ring::new(3).unwrap(), 3, &NoopObserver).unwrap();
        let agent = AgentId(0);
        // Long enough that only an unpark can end each pause in time.
        let dawdle = Dawdle::for_agent(Duration::from_secs(30), 5, agent);
        let worker = Worker::new(agent, AcquisitionPolicy::Parity, 3, &table, dawdle);

        let report = thread::scope(|s| {
            let handle = s.spawn(move || worker.run());
            while !handle.is_finished() {
                handle.thread().unpark();
                thread::sleep(Duration::from_millis(5));
            }
            handle.join().unwrap()
        })
        .unwrap();

        assert_eq!(report.meals, 3);
        assert!(report.interrupted_delays > 0);
        let last = table.snapshot().unwrap();
        assert_eq!(last[0].remaining, 0);
        assert_eq!(last[0].state, AgentState::Thinking);
        assert_eq!(table.pool().held_count().unwrap(), 0);
    }

    #[test]
    fn dropped_worker_returns_its_forks() {
        let table = SharedTable::new(Ring::new(3).unwrap(), 1, &NoopObserver).unwrap();
        let agent = AgentId(1);
        let worker = Worker::new(agent, AcquisitionPolicy::Parity, 1, &table, still(agent));
        // Stands in for a worker that fails or unwinds mid-cycle.
        table.pool().acquire(ForkId(1), agent).unwrap();
        drop(worker);
        assert_eq!(table.pool().holder(ForkId(1)).unwrap(), None);
    }

    #[test]
    fn worker_error_display_names_the_layer() {
        let e = WorkerError::Table(TableError::LockPoisoned);
        assert!(e.to_string().starts_with("table"));
        let e = WorkerError::Pool(PoolError::Empty);
        assert!(e.to_string().starts_with("fork pool"));
    }
}
