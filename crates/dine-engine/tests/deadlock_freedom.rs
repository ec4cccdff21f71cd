//! Integration test: runs finish under contention.
//!
//! Each run happens on its own thread behind a watchdog. If the run has
//! not reported back before the deadline, the agents are assumed to be
//! stuck in a circular wait and the test fails instead of hanging.

use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use dine_engine::{AcquisitionPolicy, Dinner, DinnerConfig, DinnerReport};
use dine_test_utils::InvariantObserver;

const WATCHDOG: Duration = Duration::from_secs(60);

// ── Watchdog ─────────────────────────────────────────────────────────

fn run_with_watchdog(config: DinnerConfig) -> DinnerReport {
    let label = format!(
        "agents={} reps={} seed={} policy={}",
        config.agents, config.repetitions, config.seed, config.policy
    );
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::spawn(move || {
        let observer = InvariantObserver::new();
        let outcome = Dinner::new(config)
            .map_err(|e| e.to_string())
            .and_then(|d| d.run(&observer).map_err(|e| e.to_string()))
            .map(|report| (report, observer.violations()));
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(WATCHDOG) {
        Ok(Ok((report, violations))) => {
            assert!(violations.is_empty(), "{label}: {:?}", violations[0]);
            report
        }
        Ok(Err(e)) => panic!("{label}: run failed: {e}"),
        Err(RecvTimeoutError::Timeout) => panic!("{label}: no progress within {WATCHDOG:?}"),
        Err(RecvTimeoutError::Disconnected) => panic!("{label}: run thread panicked"),
    }
}

fn contended(agents: u32, seed: u64, policy: AcquisitionPolicy) -> DinnerConfig {
    DinnerConfig {
        agents,
        repetitions: 60,
        dawdle: Duration::from_micros(50),
        seed,
        policy,
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn parity_policy_finishes_for_small_tables() {
    for agents in [2, 3, 5, 8] {
        for seed in [1, 2, 3] {
            let report = run_with_watchdog(contended(agents, seed, AcquisitionPolicy::Parity));
            assert_eq!(report.total_meals(), u64::from(agents) * 60);
        }
    }
}

#[test]
fn lower_first_policy_finishes_for_small_tables() {
    for agents in [2, 3, 5, 8] {
        let report = run_with_watchdog(contended(agents, 42, AcquisitionPolicy::LowerFirst));
        assert_eq!(report.total_meals(), u64::from(agents) * 60);
    }
}

#[test]
fn no_pauses_maximises_contention() {
    for agents in [2, 5, 7] {
        let config = DinnerConfig {
            dawdle: Duration::ZERO,
            repetitions: 500,
            ..contended(agents, 0, AcquisitionPolicy::Parity)
        };
        let report = run_with_watchdog(config);
        assert!(report.agents.iter().all(|a| a.meals == 500));
    }
}

#[test]
fn larger_table_finishes() {
    let config = DinnerConfig {
        repetitions: 10,
        ..contended(64, 9, AcquisitionPolicy::Parity)
    };
    let report = run_with_watchdog(config);
    assert_eq!(report.agents.len(), 64);
    assert_eq!(report.total_meals(), 640);
}
