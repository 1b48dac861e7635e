// src/dag/constraint.rs

//! Fluent constraint cursor.
//!
//! The unit passed to `Sequencer::play` is the *anchor*: every call on the
//! returned cursor relates some other unit to that anchor. For example
//! `play(a).before(b).before(c)` starts both `b` and `c` when `a` ends; it
//! says nothing about `b` relative to `c`.

use std::time::Duration;

use tracing::warn;

use crate::dag::graph::DependencyGraph;
use crate::dag::node::{Dependency, NodeId};
use crate::types::{Rule, UnitId};
use crate::unit::{Delay, UnitRegistry};

/// Cursor returned by [`Sequencer::play`](crate::Sequencer::play).
///
/// A cursor created for an absent unit is a no-op: every method returns
/// immediately without touching the graph.
#[derive(Debug)]
pub struct Constraint<'a> {
    graph: &'a mut DependencyGraph,
    units: &'a mut UnitRegistry,
    anchor: Option<NodeId>,
    last_delay: Option<UnitId>,
}

impl<'a> Constraint<'a> {
    pub(crate) fn new(
        graph: &'a mut DependencyGraph,
        units: &'a mut UnitRegistry,
        unit: Option<UnitId>,
    ) -> Self {
        let anchor = match unit {
            Some(unit) if units.contains(unit) => Some(graph.get_or_insert(unit)),
            Some(unit) => {
                warn!(%unit, "play() called with a unit unknown to this sequencer; ignoring");
                None
            }
            None => {
                warn!("play() called without a unit; ignoring");
                None
            }
        };
        graph.mark_dirty();

        Self {
            graph,
            units,
            anchor,
            last_delay: None,
        }
    }

    /// Whether this cursor was created for an absent unit.
    pub fn is_noop(&self) -> bool {
        self.anchor.is_none()
    }

    /// The anchor unit, if any.
    pub fn anchor(&self) -> Option<UnitId> {
        self.anchor.map(|id| self.graph.node(id).unit())
    }

    /// The synthetic timer created by the most recent [`after_delay`](Self::after_delay).
    pub fn last_delay(&self) -> Option<UnitId> {
        self.last_delay
    }

    /// Start `other` at the same moment the anchor starts.
    pub fn with(&mut self, other: UnitId) -> &mut Self {
        if let Some(anchor) = self.anchor {
            if let Some(node) = self.resolve(other, "with") {
                self.graph
                    .add_dependency(node, Dependency::new(anchor, Rule::With));
            }
        }
        self
    }

    /// Start `other` when the anchor ends.
    pub fn before(&mut self, other: UnitId) -> &mut Self {
        if let Some(anchor) = self.anchor {
            if let Some(node) = self.resolve(other, "before") {
                self.graph
                    .add_dependency(node, Dependency::new(anchor, Rule::After));
            }
        }
        self
    }

    /// Start the anchor when `other` ends.
    pub fn after(&mut self, other: UnitId) -> &mut Self {
        if let Some(anchor) = self.anchor {
            if let Some(node) = self.resolve(other, "after") {
                self.graph
                    .add_dependency(anchor, Dependency::new(node, Rule::After));
            }
        }
        self
    }

    /// Start the anchor once `delay` has elapsed.
    ///
    /// Adds a synthetic [`Delay`] unit to the graph; the anchor waits for it
    /// to end like for any other unit.
    pub fn after_delay(&mut self, delay: Duration) -> &mut Self {
        if let Some(anchor) = self.anchor {
            let timer = self.units.insert_synthetic(
                format!("delay({delay:?})"),
                Box::new(Delay::new(delay)),
            );
            let node = self.graph.get_or_insert(timer);
            self.graph
                .add_dependency(anchor, Dependency::new(node, Rule::After));
            self.last_delay = Some(timer);
        }
        self
    }

    fn resolve(&mut self, unit: UnitId, op: &str) -> Option<NodeId> {
        if self.units.contains(unit) {
            Some(self.graph.get_or_insert(unit))
        } else {
            warn!(%unit, op, "constraint names a unit unknown to this sequencer; ignoring");
            None
        }
    }
}
