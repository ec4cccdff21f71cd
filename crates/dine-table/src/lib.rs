//! Shared state for the dining table simulation.
//!
//! Two pieces, both shared by reference across every worker thread:
//!
//! - [`ForkPool`]: one binary-possession lock per fork. `acquire` blocks
//!   the caller until the fork is free; `release` wakes at most one waiter.
//! - [`SharedTable`]: the agent records behind a single global update lock,
//!   plus the pool. Each mutation is applied and handed to the observer
//!   inside one short critical section, so observers never see a torn
//!   record.
//!
//! The update lock is never held across a fork acquire/release or a delay;
//! the API makes that impossible since each call takes and drops it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pool;
pub mod table;

pub use pool::{ForkPool, PoolError};
pub use table::SharedTable;
