//! Worker state machine and dispatcher for the dining table simulation.
//!
//! [`Dinner`] validates a [`DinnerConfig`], builds the shared table, runs
//! one worker thread per agent through its think/acquire/eat/release
//! cycles, joins them all, and returns a [`DinnerReport`].
//!
//! # Architecture
//!
//! ```text
//! Dispatcher                Worker i (one per agent)          SharedTable
//!     |                          |                               |
//!     | validate config          |                               |
//!     | SharedTable::new ------------------------------------->  | records + pool
//!     | announce_start --------------------------------------->  | on_start
//!     | spawn_scoped ----------->|                               |
//!     |                          | apply(Hungry) --------------->| on_change
//!     |                          | pool.acquire(first)  (blocks) |
//!     |                          | apply(PickedUp) ------------->| on_change
//!     |                          | pool.acquire(second) (blocks) |
//!     |                          | apply(StartedEating) -------->| on_change
//!     |                          | dawdle                        |
//!     |                          | apply(FinishedEating) ------->| on_change
//!     |                          | pool.release(second)          |
//!     |                          | apply(PutDown) -------------->| on_change
//!     |                          | pool.release(first)           |
//!     |                          | dawdle                        |
//!     |                          | apply(RepetitionDone) ------->| on_change
//!     | join all <---------------|                               |
//!     | check pool is free, announce_finish ------------------>  | on_finish
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dawdle;
pub mod dinner;
pub mod metrics;
pub mod policy;
mod worker;

pub use config::{ConfigError, DinnerConfig};
pub use dawdle::{Dawdle, DelayOutcome};
pub use dinner::{Dinner, DinnerError};
pub use metrics::{AgentReport, DinnerReport};
pub use policy::{AcquisitionPolicy, PolicyError};
pub use worker::WorkerError;
