// src/dag/node.rs

//! Arena node and dependency edge types.

use crate::types::{Rule, UnitId};

/// Index of a node inside its [`DependencyGraph`](super::DependencyGraph).
///
/// Node ids are handed out in creation order and never reused, so comparing
/// two ids compares creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A precondition on the node that owns it: "`node` must have reached the
/// event named by `rule`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub node: NodeId,
    pub rule: Rule,
}

impl Dependency {
    pub fn new(node: NodeId, rule: Rule) -> Self {
        Self { node, rule }
    }
}

/// One unit in the graph plus its edges.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) unit: UnitId,
    /// Edges into this node, in the order they were declared.
    pub(crate) dependencies: Vec<Dependency>,
    /// Working copy of `dependencies` for the current run. Entries are removed
    /// as they get satisfied.
    pub(crate) runtime_dependencies: Vec<Dependency>,
    /// Nodes whose `dependencies` reference this node (no duplicates).
    pub(crate) dependents: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(unit: UnitId) -> Self {
        Self {
            unit,
            dependencies: Vec::new(),
            runtime_dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Dependencies not yet satisfied in the current (or last) run.
    pub fn pending_dependencies(&self) -> &[Dependency] {
        &self.runtime_dependencies
    }

    pub fn dependents(&self) -> &[NodeId] {
        &self.dependents
    }

    /// Distinct prerequisite nodes, in declaration order.
    pub fn prerequisites(&self) -> Vec<NodeId> {
        let mut seen = Vec::with_capacity(self.dependencies.len());
        for dep in &self.dependencies {
            if !seen.contains(&dep.node) {
                seen.push(dep.node);
            }
        }
        seen
    }

    pub fn is_root(&self) -> bool {
        self.dependencies.is_empty()
    }
}
