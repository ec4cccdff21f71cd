//! Observer hook for table mutations.
//!
//! The shared table calls [`TableObserver::on_change`] once per applied
//! event, while its update lock is still held. Implementations must not
//! block for long and cannot reach back into the table: they get a
//! read-only [`TableView`] and nothing else.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::error::InvariantViolation;
use crate::id::AgentId;
use crate::record::TableEvent;
use crate::view::TableView;

/// Receives every table snapshot.
///
/// `Sync` because every worker thread calls it (one at a time, under the
/// table lock).
pub trait TableObserver: Sync {
    /// Called once with the initial table, before any worker starts.
    fn on_start(&self, _table: TableView<'_>) {}

    /// Called after `agent`'s record accepted `event`.
    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>);

    /// Called once with the final table, after every worker has joined.
    fn on_finish(&self, _table: TableView<'_>) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TableObserver for NoopObserver {
    fn on_change(&self, _agent: AgentId, _event: TableEvent, _table: TableView<'_>) {}
}

/// Runs [`TableView::check_invariants`] on every table it is shown and
/// keeps whatever it finds.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    checked: AtomicU64,
    violations: Mutex<Vec<InvariantViolation>>,
}

impl InvariantChecker {
    /// A checker that has seen nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables checked.
    pub fn checked(&self) -> u64 {
        self.checked.load(Ordering::Relaxed)
    }

    /// Every violation found, in publication order.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        match self.violations.lock() {
            Ok(v) => v.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Whether every table checked so far was consistent.
    pub fn is_clean(&self) -> bool {
        self.violations().is_empty()
    }

    fn check(&self, table: TableView<'_>) {
        self.checked.fetch_add(1, Ordering::Relaxed);
        if let Err(v) = table.check_invariants() {
            match self.violations.lock() {
                Ok(mut list) => list.push(v),
                Err(poisoned) => poisoned.into_inner().push(v),
            }
        }
    }
}

impl TableObserver for InvariantChecker {
    fn on_start(&self, table: TableView<'_>) {
        self.check(table);
    }

    fn on_change(&self, _agent: AgentId, _event: TableEvent, table: TableView<'_>) {
        self.check(table);
    }

    fn on_finish(&self, table: TableView<'_>) {
        self.check(table);
    }
}

impl<T: TableObserver + ?Sized> TableObserver for &T {
    fn on_start(&self, table: TableView<'_>) {
        (**self).on_start(table);
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        (**self).on_change(agent, event, table);
    }

    fn on_finish(&self, table: TableView<'_>) {
        (**self).on_finish(table);
    }
}

impl<T: TableObserver + ?Sized> TableObserver for Box<T> {
    fn on_start(&self, table: TableView<'_>) {
        (**self).on_start(table);
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        (**self).on_change(agent, event, table);
    }

    fn on_finish(&self, table: TableView<'_>) {
        (**self).on_finish(table);
    }
}

/// Fan out to both observers, first `A` then `B`.
impl<A: TableObserver, B: TableObserver> TableObserver for (A, B) {
    fn on_start(&self, table: TableView<'_>) {
        self.0.on_start(table);
        self.1.on_start(table);
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        self.0.on_change(agent, event, table);
        self.1.on_change(agent, event, table);
    }

    fn on_finish(&self, table: TableView<'_>) {
        self.0.on_finish(table);
        self.1.on_finish(table);
    }
}

/// Fan out to a runtime-sized list of observers, in order.
impl<T: TableObserver> TableObserver for [T] {
    fn on_start(&self, table: TableView<'_>) {
        for o in self {
            o.on_start(table);
        }
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        for o in self {
            o.on_change(agent, event, table);
        }
    }

    fn on_finish(&self, table: TableView<'_>) {
        for o in self {
            o.on_finish(table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AgentRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        starts: AtomicUsize,
        changes: AtomicUsize,
        finishes: AtomicUsize,
    }

    impl TableObserver for Counter {
        fn on_start(&self, _table: TableView<'_>) {
            self.starts.fetch_add(1, Ordering::Relaxed);
        }
        fn on_change(&self, _agent: AgentId, _event: TableEvent, _table: TableView<'_>) {
            self.changes.fetch_add(1, Ordering::Relaxed);
        }
        fn on_finish(&self, _table: TableView<'_>) {
            self.finishes.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn pair_forwards_to_both() {
        let records = [AgentRecord::new(AgentId(0), 1), AgentRecord::new(AgentId(1), 1)];
        let view = TableView::new(&records);
        let pair = (Counter::default(), Counter::default());
        pair.on_start(view);
        pair.on_change(AgentId(0), TableEvent::Hungry, view);
        pair.on_finish(view);
        for c in [&pair.0, &pair.1] {
            assert_eq!(c.starts.load(Ordering::Relaxed), 1);
            assert_eq!(c.changes.load(Ordering::Relaxed), 1);
            assert_eq!(c.finishes.load(Ordering::Relaxed), 1);
        }
    }

    #[test]
    fn slice_and_reference_forward() {
        let records = [AgentRecord::new(AgentId(0), 1), AgentRecord::new(AgentId(1), 1)];
        let view = TableView::new(&records);
        let list = vec![Counter::default(), Counter::default(), Counter::default()];
        let slice: &[Counter] = &list;
        slice.on_change(AgentId(1), TableEvent::Hungry, view);
        let boxed: Box<dyn TableObserver + '_> = Box::new(slice);
        boxed.on_change(AgentId(1), TableEvent::Hungry, view);
        assert!(list.iter().all(|c| c.changes.load(Ordering::Relaxed) == 2));
    }

    #[test]
    fn checker_collects_violations() {
        let mut records = [
            AgentRecord::new(AgentId(0), 1),
            AgentRecord::new(AgentId(1), 1),
            AgentRecord::new(AgentId(2), 1),
        ];
        let checker = InvariantChecker::new();
        checker.on_start(TableView::new(&records));
        assert!(checker.is_clean());

        // Fork 0 claimed by both of its users.
        records[0].holds_left = true;
        records[2].holds_right = true;
        checker.on_change(AgentId(0), TableEvent::Hungry, TableView::new(&records));
        assert_eq!(checker.checked(), 2);
        assert_eq!(checker.violations().len(), 1);
        assert!(!checker.is_clean());
    }
}
