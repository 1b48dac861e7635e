// src/sim/timeline.rs

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::time::Duration;

use crate::types::Lifecycle;

/// One observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub label: String,
    pub event: Lifecycle,
}

#[derive(Debug, Default)]
struct State {
    now: Duration,
    entries: Vec<TimelineEntry>,
}

/// Shared simulated clock plus the log of everything that happened on it.
///
/// Cloning yields another handle on the same timeline.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    inner: Rc<RefCell<State>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn advance(&self, delta: Duration) {
        self.inner.borrow_mut().now += delta;
    }

    pub fn record(&self, label: &str, event: Lifecycle) {
        let mut state = self.inner.borrow_mut();
        let at = state.now;
        state.entries.push(TimelineEntry {
            at,
            label: label.to_string(),
            event,
        });
    }

    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.inner.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First time `label` emitted `event`.
    pub fn first(&self, label: &str, event: Lifecycle) -> Option<Duration> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|e| e.label == label && e.event == event)
            .map(|e| e.at)
    }

    /// One `t=<ms>ms <label> <event>` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in self.inner.borrow().entries.iter() {
            let _ = writeln!(
                out,
                "t={}ms {} {}",
                entry.at.as_millis(),
                entry.label,
                entry.event
            );
        }
        out
    }
}
