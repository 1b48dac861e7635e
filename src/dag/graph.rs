// src/dag/graph.rs

use std::collections::HashMap;

use tracing::debug;

use crate::dag::node::{Dependency, Node, NodeId};
use crate::types::UnitId;

/// In-memory dependency graph keyed by unit identity.
///
/// Nodes live in a single arena (`nodes`) and edges refer to them by
/// [`NodeId`], so there are no owning back-references. The topological order
/// is cached in `sorted` and only recomputed after an edit sets
/// `needs_sort`.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<UnitId, NodeId>,
    pub(crate) sorted: Vec<NodeId>,
    pub(crate) needs_sort: bool,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            sorted: Vec::new(),
            needs_sort: true,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the cached order is stale.
    pub fn needs_sort(&self) -> bool {
        self.needs_sort
    }

    pub fn mark_dirty(&mut self) {
        self.needs_sort = true;
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub(crate) fn raw_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node wrapping `unit`, if one was created.
    pub fn node_for(&self, unit: UnitId) -> Option<NodeId> {
        self.index.get(&unit).copied()
    }

    /// Look up the node for `unit`, creating it if needed.
    pub fn get_or_insert(&mut self, unit: UnitId) -> NodeId {
        if let Some(id) = self.index.get(&unit) {
            return *id;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(unit));
        self.index.insert(unit, id);
        self.needs_sort = true;
        debug!(%unit, node = id.0, "created graph node");
        id
    }

    /// Record that `dependent` waits on `dependency`.
    ///
    /// Keeps the reverse `dependents` list in sync (without duplicates).
    pub fn add_dependency(&mut self, dependent: NodeId, dependency: Dependency) {
        self.nodes[dependent.0].dependencies.push(dependency);

        let prerequisite = &mut self.nodes[dependency.node.0];
        if !prerequisite.dependents.contains(&dependent) {
            prerequisite.dependents.push(dependent);
        }

        self.needs_sort = true;
        debug!(
            dependent = dependent.0,
            prerequisite = dependency.node.0,
            rule = ?dependency.rule,
            "added dependency edge"
        );
    }

    /// Refill every node's pending set from its static dependency list.
    ///
    /// Must run before each activation pass: the pending sets are consumed as
    /// listeners fire, even when the cached order is reused.
    pub fn reset_runtime_dependencies(&mut self) {
        for node in self.nodes.iter_mut() {
            node.runtime_dependencies.clear();
            node.runtime_dependencies.extend_from_slice(&node.dependencies);
        }
    }
}
