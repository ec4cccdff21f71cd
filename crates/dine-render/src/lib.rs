//! Text renderer for dining table snapshots.
//!
//! [`layout`] holds the pure formatting functions; [`TableRenderer`] is a
//! [`TableObserver`](dine_core::TableObserver) that writes one line per
//! published snapshot to any `io::Write`.
//!
//! ```text
//! |==============|==============|
//! |   A          |   B          |
//! |==============|==============|
//! | 01 Eat       | -- Think     |
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod layout;
pub mod renderer;

pub use layout::Layout;
pub use renderer::TableRenderer;
