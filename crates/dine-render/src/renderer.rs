//! Observer that prints the table.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use dine_core::{AgentId, TableEvent, TableObserver, TableView};
use tracing::warn;

use crate::layout::Layout;

/// Writes a header on start, one row per change, and a closing border on
/// finish.
///
/// Output is line-buffered by the caller's choice of writer; each line is
/// written with a single `writeln!`. Write errors are logged once and
/// otherwise ignored so a closed pipe never stops the run.
pub struct TableRenderer<W> {
    out: Mutex<W>,
    rows: AtomicU64,
    write_failed: AtomicBool,
}

impl<W: Write + Send> TableRenderer<W> {
    /// Render into `out`.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            rows: AtomicU64::new(0),
            write_failed: AtomicBool::new(false),
        }
    }

    /// Rows written so far, header and borders excluded.
    pub fn rows(&self) -> u64 {
        self.rows.load(Ordering::Relaxed)
    }

    /// Whether any write has failed.
    pub fn write_failed(&self) -> bool {
        self.write_failed.load(Ordering::Relaxed)
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) {
        let result = match self.out.lock() {
            Ok(mut out) => lines
                .into_iter()
                .try_for_each(|line| writeln!(out, "{line}"))
                .and_then(|()| out.flush()),
            Err(_) => Err(io::Error::other("renderer output lock poisoned")),
        };
        if let Err(e) = result {
            if !self.write_failed.swap(true, Ordering::Relaxed) {
                warn!(error = %e, "table output failed, further errors suppressed");
            }
        }
    }
}

impl<W: Write + Send> TableObserver for TableRenderer<W> {
    fn on_start(&self, table: TableView<'_>) {
        let layout = Layout::new(table.len());
        let [top, labels, bottom] = layout.header();
        let row = layout.row(table);
        self.write_lines([top.as_str(), labels.as_str(), bottom.as_str(), row.as_str()]);
    }

    fn on_change(&self, _agent: AgentId, _event: TableEvent, table: TableView<'_>) {
        let row = Layout::new(table.len()).row(table);
        self.write_lines([row.as_str()]);
        self.rows.fetch_add(1, Ordering::Relaxed);
    }

    fn on_finish(&self, table: TableView<'_>) {
        let border = Layout::new(table.len()).border();
        self.write_lines([border.as_str()]);
    }
}

impl<W> fmt::Debug for TableRenderer<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableRenderer")
            .field("rows", &self.rows.load(Ordering::Relaxed))
            .field("write_failed", &self.write_failed.load(Ordering::Relaxed))
            .finish()
    }
}
