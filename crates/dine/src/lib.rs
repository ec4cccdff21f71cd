//! Dine: a deadlock-free dining table simulation.
//!
//! This is the facade crate that re-exports the public API from the Dine
//! sub-crates, and the home of the `dine` command-line program.
//!
//! # Quick start
//!
//! ```rust
//! use dine::prelude::*;
//! use std::time::Duration;
//!
//! let config = DinnerConfig {
//!     agents: 5,
//!     repetitions: 2,
//!     dawdle: Duration::from_millis(1),
//!     seed: 7,
//!     policy: AcquisitionPolicy::Parity,
//! };
//! let checker = InvariantChecker::new();
//! let report = Dinner::new(config).unwrap().run(&checker).unwrap();
//! assert_eq!(report.total_meals(), 10);
//! assert!(checker.is_clean());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `dine-core` | Ids, ring topology, agent records, views, observer trait |
//! | [`table`] | `dine-table` | Fork pool and the shared table |
//! | [`engine`] | `dine-engine` | Configuration, policies, workers, dispatcher, reports |
//! | [`render`] | `dine-render` | Text layout and the table renderer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and ids (`dine-core`).
///
/// Contains the ring topology, [`types::AgentRecord`] with its legal
/// transitions, [`types::TableView`], and the [`types::TableObserver`]
/// hook.
pub use dine_core as types;

/// Fork pool and shared table (`dine-table`).
pub use dine_table as table;

/// Configuration, acquisition policies, and the dispatcher (`dine-engine`).
///
/// [`engine::Dinner`] runs a validated [`engine::DinnerConfig`] and
/// returns an [`engine::DinnerReport`].
pub use dine_engine as engine;

/// Text rendering of table snapshots (`dine-render`).
pub use dine_render as render;

/// Common imports for typical Dine usage.
///
/// ```rust
/// use dine::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use dine_core::{
        AgentId, AgentRecord, AgentState, ForkId, InvariantChecker, NoopObserver, Ring, Side,
        TableEvent, TableObserver, TableView,
    };

    // Errors
    pub use dine_core::{InvariantViolation, TableError, TopologyError};
    pub use dine_table::PoolError;

    // Engine
    pub use dine_engine::{
        AcquisitionPolicy, AgentReport, ConfigError, Dinner, DinnerConfig, DinnerError,
        DinnerReport,
    };

    // Rendering
    pub use dine_render::TableRenderer;
}
