//! Counting helpers over recorded frame lists.

use dine_core::{AgentState, ForkId, TableEvent, TableView};

use crate::Frame;

/// Number of transitions into Eating.
pub fn eat_transitions(frames: &[Frame]) -> usize {
    frames
        .iter()
        .filter(|f| matches!(f.event, TableEvent::StartedEating(_)))
        .count()
}

/// Transitions into Eating, per agent.
pub fn meals_per_agent(frames: &[Frame], agents: usize) -> Vec<usize> {
    let mut meals = vec![0; agents];
    for f in frames {
        if matches!(f.event, TableEvent::StartedEating(_)) {
            meals[f.agent.index()] += 1;
        }
    }
    meals
}

/// How many times each fork went from held to free, replaying the frames
/// from an all-free table.
pub fn fork_releases(frames: &[Frame], forks: usize) -> Vec<usize> {
    let mut held = vec![false; forks];
    let mut releases = vec![0; forks];
    for f in frames {
        let view = TableView::new(&f.table);
        for (i, was_held) in held.iter_mut().enumerate() {
            let now = view.fork_held(ForkId(i as u32));
            if *was_held && !now {
                releases[i] += 1;
            }
            *was_held = now;
        }
    }
    releases
}

/// Largest number of simultaneous eaters in any frame.
pub fn max_concurrent_eaters(frames: &[Frame]) -> usize {
    frames
        .iter()
        .map(|f| {
            f.table
                .iter()
                .filter(|r| r.state == AgentState::Eating)
                .count()
        })
        .max()
        .unwrap_or(0)
}
