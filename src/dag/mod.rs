// src/dag/mod.rs

//! Dependency graph representation and ordering.
//!
//! - [`node`] holds the arena node type and dependency edges.
//! - [`graph`] owns every node plus the cached sort result.
//! - [`sort`] turns the graph into a start order, detecting cycles.
//! - [`constraint`] is the fluent cursor returned by `Sequencer::play`.

pub mod constraint;
pub mod graph;
pub mod node;
pub mod sort;

pub use constraint::Constraint;
pub use graph::DependencyGraph;
pub use node::{Dependency, Node, NodeId};
pub use sort::CycleDetected;
