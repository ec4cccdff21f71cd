//! Column layout.
//!
//! One column per agent, each `agents + 9` characters wide between `|`
//! separators:
//!
//! - one space,
//! - one slot per fork at the table (the fork's digit if this agent
//!   holds it, `-` otherwise),
//! - one space,
//! - the state label padded to [`STATE_WIDTH`],
//! - one space.
//!
//! Fork digits are base 36, wrapping after `z`.

use std::fmt::Write as _;

use dine_core::{AgentId, AgentRecord, AgentState, ForkId, TableView};

/// Width reserved for the state label.
pub const STATE_WIDTH: usize = 6;

/// Placeholder for a fork the agent does not hold.
pub const FREE_SLOT: char = '-';

/// Layout for a table of a fixed size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    agents: usize,
}

impl Layout {
    /// Layout for `agents` columns.
    pub fn new(agents: usize) -> Self {
        Self { agents }
    }

    /// Number of columns.
    pub fn agents(&self) -> usize {
        self.agents
    }

    /// Width of one column, excluding its separators.
    pub fn column_width(&self) -> usize {
        1 + self.agents + 1 + STATE_WIDTH + 1
    }

    /// Width of a whole line, separators included.
    pub fn line_width(&self) -> usize {
        1 + self.agents * (self.column_width() + 1)
    }

    /// `|====|====|` across every column.
    pub fn border(&self) -> String {
        let column = "=".repeat(self.column_width());
        let mut line = String::with_capacity(self.line_width());
        line.push('|');
        for _ in 0..self.agents {
            line.push_str(&column);
            line.push('|');
        }
        line
    }

    /// Column headings, each name placed just after the fork slots.
    pub fn labels(&self) -> String {
        let width = self.column_width();
        let indent = self.agents + 1;
        let mut line = String::with_capacity(self.line_width());
        line.push('|');
        for i in 0..self.agents {
            let name = agent_label(AgentId(i as u32));
            let _ = write!(line, "{:indent$}{:<rest$}|", "", name, rest = width - indent);
        }
        line
    }

    /// The three header lines: border, labels, border.
    pub fn header(&self) -> [String; 3] {
        let border = self.border();
        [border.clone(), self.labels(), border]
    }

    /// One line showing every agent in `table`.
    pub fn row(&self, table: TableView<'_>) -> String {
        let mut line = String::with_capacity(self.line_width());
        line.push('|');
        for record in table.iter() {
            self.push_cell(&mut line, record);
            line.push('|');
        }
        line
    }

    fn push_cell(&self, line: &mut String, record: &AgentRecord) {
        let n = self.agents as u32;
        let left = ForkId(record.id.0);
        let right = ForkId((record.id.0 + 1) % n.max(1));
        line.push(' ');
        for f in 0..n {
            let fork = ForkId(f);
            let held = (record.holds_left && fork == left) || (record.holds_right && fork == right);
            line.push(if held { fork_glyph(fork) } else { FREE_SLOT });
        }
        let _ = write!(line, " {:<width$} ", state_label(record.state), width = STATE_WIDTH);
    }
}

/// Column heading for `agent`: `A`..`Z`, then `AA`, `AB`, and so on.
pub fn agent_label(agent: AgentId) -> String {
    let mut n = agent.0 as usize + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

/// Single-character mark for a held fork.
pub fn fork_glyph(fork: ForkId) -> char {
    char::from_digit(fork.0 % 36, 36).unwrap_or(FREE_SLOT)
}

/// Text shown for a state. Hungry agents show nothing.
pub fn state_label(state: AgentState) -> &'static str {
    match state {
        AgentState::Thinking => "Think",
        AgentState::Hungry => "",
        AgentState::Eating => "Eat",
    }
}
