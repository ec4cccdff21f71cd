//! Test observers and trace helpers for dine development.
//!
//! - [`RecordingObserver`] keeps a copy of every published table.
//! - [`InvariantObserver`] checks each table as it is published and
//!   panics on request.
//! - [`ChannelObserver`] forwards frames over a crossbeam channel.
//!
//! The [`trace`] module turns a recorded frame list into the counts the
//! tests assert on.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{Receiver, Sender};
use dine_core::{
    AgentId, AgentRecord, InvariantChecker, InvariantViolation, TableEvent, TableObserver, TableView,
};

pub mod trace;

/// One published table, copied out of the lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Position in publication order, starting at 1.
    pub seq: u64,
    pub agent: AgentId,
    pub event: TableEvent,
    pub table: Vec<AgentRecord>,
}

/// Copies every table it is shown.
#[derive(Default)]
pub struct RecordingObserver {
    start: Mutex<Option<Vec<AgentRecord>>>,
    frames: Mutex<Vec<Frame>>,
    finish: Mutex<Option<Vec<AgentRecord>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table passed to `on_start`, if it ran.
    pub fn start(&self) -> Option<Vec<AgentRecord>> {
        self.start.lock().unwrap().clone()
    }

    /// Every `on_change` frame in publication order.
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    /// Table passed to `on_finish`, if it ran.
    pub fn finish(&self) -> Option<Vec<AgentRecord>> {
        self.finish.lock().unwrap().clone()
    }
}

impl TableObserver for RecordingObserver {
    fn on_start(&self, table: TableView<'_>) {
        *self.start.lock().unwrap() = Some(table.records().to_vec());
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        let mut frames = self.frames.lock().unwrap();
        let seq = frames.len() as u64 + 1;
        frames.push(Frame {
            seq,
            agent,
            event,
            table: table.records().to_vec(),
        });
    }

    fn on_finish(&self, table: TableView<'_>) {
        *self.finish.lock().unwrap() = Some(table.records().to_vec());
    }
}

/// [`InvariantChecker`] with a panicking assertion for tests.
#[derive(Default)]
pub struct InvariantObserver {
    inner: InvariantChecker,
}

impl InvariantObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables checked.
    pub fn checked(&self) -> u64 {
        self.inner.checked()
    }

    /// Every violation seen, in order.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        self.inner.violations()
    }

    /// Panic with the first violation, if any.
    pub fn assert_clean(&self) {
        let violations = self.violations();
        assert!(
            violations.is_empty(),
            "{} invariant violation(s), first: {}",
            violations.len(),
            violations[0]
        );
    }
}

impl TableObserver for InvariantObserver {
    fn on_start(&self, table: TableView<'_>) {
        self.inner.on_start(table);
    }

    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        self.inner.on_change(agent, event, table);
    }

    fn on_finish(&self, table: TableView<'_>) {
        self.inner.on_finish(table);
    }
}

/// Forwards each frame over an unbounded channel.
///
/// Sending never blocks, so it is safe under the table lock. Frames sent
/// after the receiver is dropped are discarded.
pub struct ChannelObserver {
    seq: AtomicU64,
    tx: Sender<Frame>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<Frame>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (
            Self {
                seq: AtomicU64::new(0),
                tx,
            },
            rx,
        )
    }
}

impl TableObserver for ChannelObserver {
    fn on_change(&self, agent: AgentId, event: TableEvent, table: TableView<'_>) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.tx.send(Frame {
            seq,
            agent,
            event,
            table: table.records().to_vec(),
        });
    }
}
