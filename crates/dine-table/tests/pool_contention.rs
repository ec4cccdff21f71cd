//! Integration test: fork exclusion under many threads.
//!
//! Several threads hammer the same fork. Each one records when it gets
//! the fork and when it gives it back; the intervals must never overlap.
//! A second test checks that a waiter blocked in `acquire` is woken by
//! the release and not before.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use dine_core::{AgentId, ForkId, NoopObserver, Ring, Side, TableEvent};
use dine_table::{ForkPool, SharedTable};
use dine_test_utils::InvariantObserver;

#[test]
fn one_holder_at_a_time() {
    let pool = ForkPool::new(1).unwrap();
    let inside = AtomicUsize::new(0);
    let entries = AtomicUsize::new(0);

    thread::scope(|s| {
        for t in 0..8u32 {
            let (pool, inside, entries) = (&pool, &inside, &entries);
            s.spawn(move || {
                for _ in 0..500 {
                    pool.acquire(ForkId(0), AgentId(t)).unwrap();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    entries.fetch_add(1, Ordering::Relaxed);
                    assert_eq!(inside.fetch_sub(1, Ordering::SeqCst), 1);
                    pool.release(ForkId(0), AgentId(t)).unwrap();
                }
            });
        }
    });

    assert_eq!(entries.load(Ordering::Relaxed), 8 * 500);
    assert_eq!(pool.held_count().unwrap(), 0);
}

#[test]
fn waiter_wakes_on_release() {
    let pool = ForkPool::new(2).unwrap();
    pool.acquire(ForkId(1), AgentId(0)).unwrap();
    let (tx, rx) = crossbeam_channel::bounded(1);

    thread::scope(|s| {
        s.spawn(|| {
            pool.acquire(ForkId(1), AgentId(1)).unwrap();
            tx.send(()).unwrap();
        });

        assert_eq!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(RecvTimeoutError::Timeout)
        );
        pool.release(ForkId(1), AgentId(0)).unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(10)).is_ok());
    });

    assert_eq!(pool.holder(ForkId(1)).unwrap(), Some(AgentId(1)));
}

#[test]
fn concurrent_table_updates_stay_consistent() {
    let observer = InvariantObserver::new();
    let ring = Ring::new(4).unwrap();
    let table = SharedTable::new(ring, 50, &observer).unwrap();

    // Agents 0 and 2 share no fork, so they can cycle freely side by side.
    thread::scope(|s| {
        for seat in [0u32, 2] {
            let table = &table;
            s.spawn(move || {
                let agent = AgentId(seat);
                for _ in 0..50 {
                    for event in [
                        TableEvent::Hungry,
                        TableEvent::PickedUp(Side::Left),
                        TableEvent::StartedEating(Side::Right),
                        TableEvent::FinishedEating(Side::Right),
                        TableEvent::PutDown(Side::Left),
                        TableEvent::RepetitionDone,
                    ] {
                        table.apply(agent, event).unwrap();
                    }
                }
            });
        }
    });

    observer.assert_clean();
    assert_eq!(observer.checked(), 2 * 50 * 6);
    assert_eq!(table.published(), 600);
    let last = table.snapshot().unwrap();
    assert_eq!(last[0].remaining, 0);
    assert_eq!(last[1].remaining, 50);
}

#[test]
fn table_without_observer_counts_snapshots() {
    let table = SharedTable::new(Ring::new(2).unwrap(), 1, &NoopObserver).unwrap();
    table.apply(AgentId(0), TableEvent::Hungry).unwrap();
    assert_eq!(table.published(), 1);
}
