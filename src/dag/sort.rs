// src/dag/sort.rs

//! Wave-based topological sort with cycle diagnostics.
//!
//! Nodes without dependencies form the first wave, in creation order. Every
//! node of a wave is emitted before any node it unblocks; the nodes unblocked
//! by a wave form the next wave, again in creation order.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::dag::node::{Node, NodeId};
use crate::types::UnitId;

/// The graph could not be ordered.
///
/// `units` lists the units taking part in a cycle, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetected {
    pub units: Vec<UnitId>,
}

impl DependencyGraph {
    /// Return the start order, re-sorting only if the graph changed since the
    /// last successful sort.
    ///
    /// A failed sort leaves the cache dirty, so the cycle is reported again on
    /// the next call.
    pub fn sorted(&mut self) -> Result<&[NodeId], CycleDetected> {
        if self.needs_sort {
            match wave_order(self.raw_nodes()) {
                Ok(order) => {
                    debug!(nodes = order.len(), "sorted dependency graph");
                    self.sorted = order;
                    self.needs_sort = false;
                }
                Err(remainder) => {
                    self.sorted.clear();
                    let members = cycle_members(self.raw_nodes(), &remainder);
                    let units: Vec<UnitId> =
                        members.iter().map(|id| self.node(*id).unit).collect();
                    warn!(?units, "cycle detected in dependency graph");
                    return Err(CycleDetected { units });
                }
            }
        } else {
            debug!("reusing cached sort order");
        }

        Ok(&self.sorted)
    }
}

/// Kahn's algorithm over the arena.
///
/// Returns the unsorted remainder on failure.
pub(crate) fn wave_order(nodes: &[Node]) -> Result<Vec<NodeId>, Vec<NodeId>> {
    let mut waiting_on: Vec<usize> = nodes.iter().map(|n| n.prerequisites().len()).collect();
    let mut sorted = Vec::with_capacity(nodes.len());

    let mut wave: Vec<NodeId> = (0..nodes.len())
        .filter(|&i| waiting_on[i] == 0)
        .map(NodeId)
        .collect();

    while !wave.is_empty() {
        let mut next = Vec::new();
        for &id in &wave {
            sorted.push(id);
            for &dependent in &nodes[id.0].dependents {
                let count = &mut waiting_on[dependent.0];
                *count -= 1;
                if *count == 0 {
                    next.push(dependent);
                }
            }
        }
        next.sort_unstable();
        wave = next;
    }

    if sorted.len() == nodes.len() {
        Ok(sorted)
    } else {
        let remainder = (0..nodes.len())
            .filter(|&i| waiting_on[i] > 0)
            .map(NodeId)
            .collect();
        Err(remainder)
    }
}

/// Narrow the unsorted remainder down to the nodes that are actually on a
/// cycle (the remainder also holds everything downstream of one).
fn cycle_members(nodes: &[Node], remainder: &[NodeId]) -> Vec<NodeId> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for id in remainder {
        graph.add_node(id.0);
    }
    for id in remainder {
        for dep in &nodes[id.0].dependencies {
            if graph.contains_node(dep.node.0) {
                graph.add_edge(dep.node.0, id.0, ());
            }
        }
    }

    let mut members: Vec<NodeId> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .map(NodeId)
        .collect();

    if members.is_empty() {
        members = remainder.to_vec();
    }
    members.sort_unstable();
    members
}
