// src/types.rs

//! Small shared value types.

use std::fmt;

use serde::Deserialize;

/// Opaque handle of a unit registered with a [`Sequencer`](crate::Sequencer).
///
/// Identity is the handle: two handles are the same unit only if they were
/// issued by the same `add` call. Each handle carries the token of the
/// registry that issued it, so a handle from another sequencer never aliases
/// a local unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

impl UnitId {
    /// Position of the unit in its sequencer's registry.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.index)
    }
}

/// Nature of a dependency edge.
///
/// - `With`: the dependent starts when the prerequisite starts.
/// - `After`: the dependent starts when the prerequisite ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    With,
    After,
}

/// Lifecycle notification emitted by an animatable unit (or by a sequencer
/// about its whole run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Start,
    End,
    Cancel,
    Repeat,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Start => "start",
            Lifecycle::End => "end",
            Lifecycle::Cancel => "cancel",
            Lifecycle::Repeat => "repeat",
        };
        f.write_str(s)
    }
}

/// How a `[[group]]` of clips in a timeline file is wired.
///
/// - `Together`: `play_together(clips)`.
/// - `Sequential`: `play_sequentially(clips)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    Together,
    Sequential,
}

impl Default for GroupMode {
    fn default() -> Self {
        GroupMode::Sequential
    }
}
