//! Core types for the dining table simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: agent and fork ids, the
//! ring topology that decides which forks an agent needs, the per-agent
//! record and its legal transitions, read-only table views with invariant
//! checking, and the observer hook the presentation layer plugs into.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod record;
pub mod ring;
pub mod traits;
pub mod view;

pub use error::{InvariantViolation, TableError, TopologyError};
pub use id::{AgentId, ForkId};
pub use record::{AgentRecord, AgentState, TableEvent};
pub use ring::{Ring, Side};
pub use traits::{InvariantChecker, NoopObserver, TableObserver};
pub use view::TableView;
