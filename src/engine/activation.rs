// src/engine/activation.rs

//! Dependency listeners for one run.
//!
//! Each waiting node subscribes once per `(prerequisite, rule)` entry of its
//! pending set. Subscriptions are records in a table keyed by
//! `(prerequisite, rule)`; firing a key consumes all of its records, which is
//! what makes every listener one-shot.
//!
//! A node whose prerequisite is canceled is blocked for the rest of the run:
//! its other prerequisites may still fire, but it never becomes ready.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dag::{DependencyGraph, NodeId};
use crate::types::Rule;

#[derive(Debug, Clone, Default)]
pub struct Activation {
    listeners: HashMap<(NodeId, Rule), Vec<NodeId>>,
    blocked: HashSet<NodeId>,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every subscription (start of a run, end of a run).
    pub fn reset(&mut self) {
        self.listeners.clear();
        self.blocked.clear();
    }

    /// Whether `node` lost a prerequisite to a cancel during this run.
    pub fn is_blocked(&self, node: NodeId) -> bool {
        self.blocked.contains(&node)
    }

    /// Number of subscriptions still waiting to fire.
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Whether some dependent still waits for `rule` on `prerequisite`.
    pub fn is_waiting_on(&self, prerequisite: NodeId, rule: Rule) -> bool {
        self.listeners.contains_key(&(prerequisite, rule))
    }

    pub fn subscribe(&mut self, prerequisite: NodeId, rule: Rule, dependent: NodeId) {
        self.listeners
            .entry((prerequisite, rule))
            .or_default()
            .push(dependent);
    }

    /// `prerequisite` reached the event named by `rule`.
    ///
    /// Fires (and detaches) every listener waiting for it and returns the
    /// dependents whose pending set became empty, in subscription order.
    pub fn satisfy(
        &mut self,
        graph: &mut DependencyGraph,
        prerequisite: NodeId,
        rule: Rule,
    ) -> Vec<NodeId> {
        let Some(dependents) = self.listeners.remove(&(prerequisite, rule)) else {
            return Vec::new();
        };

        let mut unblocked = Vec::new();
        for dependent in dependents {
            if !consume_pending(graph, dependent, prerequisite, rule) {
                continue;
            }
            if self.blocked.contains(&dependent) {
                debug!(
                    node = dependent.index(),
                    "node blocked by a canceled prerequisite; not starting"
                );
                continue;
            }
            if graph.node(dependent).runtime_dependencies.is_empty() {
                debug!(
                    node = dependent.index(),
                    "all dependencies satisfied; node is ready"
                );
                unblocked.push(dependent);
            }
        }
        unblocked
    }

    /// `prerequisite` was canceled before reaching the events its dependents
    /// wait for.
    ///
    /// Detaches those listeners, removes their pending entries and blocks the
    /// dependents for the rest of the run. Returns how many entries were
    /// dropped.
    pub fn abandon(&mut self, graph: &mut DependencyGraph, prerequisite: NodeId) -> usize {
        let mut dropped = 0;
        for rule in [Rule::With, Rule::After] {
            let Some(dependents) = self.listeners.remove(&(prerequisite, rule)) else {
                continue;
            };
            for dependent in dependents {
                if consume_pending(graph, dependent, prerequisite, rule) {
                    dropped += 1;
                    self.blocked.insert(dependent);
                }
            }
        }

        if dropped > 0 {
            debug!(
                node = prerequisite.index(),
                dropped, "prerequisite canceled; dropped pending dependencies"
            );
        }
        dropped
    }
}

/// Remove one matching entry from `dependent`'s pending set.
///
/// A missing entry means the notification was a duplicate; that is a no-op.
fn consume_pending(
    graph: &mut DependencyGraph,
    dependent: NodeId,
    prerequisite: NodeId,
    rule: Rule,
) -> bool {
    let pending = &mut graph.node_mut(dependent).runtime_dependencies;
    match pending
        .iter()
        .position(|d| d.node == prerequisite && d.rule == rule)
    {
        Some(pos) => {
            pending.remove(pos);
            true
        }
        None => {
            debug!(
                node = dependent.index(),
                prerequisite = prerequisite.index(),
                ?rule,
                "dependency not pending; ignoring notification"
            );
            false
        }
    }
}
