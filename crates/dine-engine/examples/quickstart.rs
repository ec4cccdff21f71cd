//! Dine quickstart: run a small dinner and inspect the result.
//!
//! Demonstrates:
//!   1. Building and validating a DinnerConfig
//!   2. Writing a TableObserver that watches every snapshot
//!   3. Running the dinner and reading the DinnerReport
//!
//! Run with:
//!   cargo run --example quickstart

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use dine_core::{AgentId, TableEvent, TableObserver, TableView};
use dine_engine::{AcquisitionPolicy, Dinner, DinnerConfig};

// ─── Observer ───────────────────────────────────────────────────

/// Prints each meal and tracks the busiest moment at the table.
#[derive(Default)]
struct MealLog {
    most_eating: AtomicUsize,
}

impl TableObserver for MealLog {
    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        let eating = table.eating_count();
        self.most_eating.fetch_max(eating, Ordering::Relaxed);
        if let TableEvent::StartedEating(_) = event {
            println!("agent {agent} eats ({eating} at the table eating)");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DinnerConfig {
        agents: 5,
        repetitions: 3,
        dawdle: Duration::from_millis(20),
        seed: 2024,
        policy: AcquisitionPolicy::Parity,
    };
    let dinner = Dinner::new(config)?;

    let log = MealLog::default();
    let report = dinner.run(&log)?;

    println!();
    println!("meals:        {}", report.total_meals());
    println!("snapshots:    {}", report.snapshots);
    println!("elapsed:      {:?}", report.elapsed);
    println!("longest wait: {:?}", report.max_wait());
    println!("most eating:  {}", log.most_eating.load(Ordering::Relaxed));
    for agent in &report.agents {
        println!(
            "  agent {}: {} meals, mean wait {:?}",
            agent.agent,
            agent.meals,
            agent.mean_wait()
        );
    }
    Ok(())
}
