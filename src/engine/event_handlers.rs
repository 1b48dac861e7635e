// src/engine/event_handlers.rs

//! Event handling logic for the core.

use tracing::{debug, info, warn};

use crate::dag::{DependencyGraph, NodeId};
use crate::engine::activation::Activation;
use crate::engine::playing::PlayingSet;
use crate::engine::RunPhase;
use crate::types::{Lifecycle, Rule, UnitId};

/// Command produced by the pure core, to be executed by the sequencer shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Call `start` on this unit.
    Start(UnitId),
    /// Call `end` on this unit.
    End(UnitId),
    /// Call `cancel` on this unit.
    Cancel(UnitId),
    /// Sequencer-level notification for listeners (and the parent sequencer
    /// when nested).
    Notify(Lifecycle),
}

/// Decision returned by the core after handling one input.
#[derive(Debug, Clone, Default)]
pub struct CoreStep {
    /// Commands to execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether this step closed the current run (the core is idle again).
    pub run_just_finished: bool,
}

impl CoreStep {
    /// Units this step asks to start.
    pub fn started_units(&self) -> Vec<UnitId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::Start(unit) => Some(*unit),
                _ => None,
            })
            .collect()
    }

    /// Sequencer-level notifications carried by this step.
    pub fn notifications(&self) -> Vec<Lifecycle> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                CoreCommand::Notify(event) => Some(*event),
                _ => None,
            })
            .collect()
    }
}

/// A managed unit started: release everything waiting to start *with* it.
pub fn handle_unit_started(
    graph: &mut DependencyGraph,
    activation: &mut Activation,
    playing: &mut PlayingSet,
    phase: RunPhase,
    node: NodeId,
) -> CoreStep {
    let unblocked = activation.satisfy(graph, node, Rule::With);
    CoreStep {
        commands: start_unblocked(graph, playing, phase, unblocked),
        run_just_finished: false,
    }
}

/// A managed unit ended.
///
/// Dependents waiting for this end are started *before* the unit leaves the
/// playing set, so the set cannot drain while the run still has work to do.
pub fn handle_unit_ended(
    graph: &mut DependencyGraph,
    activation: &mut Activation,
    playing: &mut PlayingSet,
    phase: RunPhase,
    node: NodeId,
) -> CoreStep {
    let unblocked = activation.satisfy(graph, node, Rule::After);
    let mut commands = start_unblocked(graph, playing, phase, unblocked);

    let unit = graph.node(node).unit();
    let mut run_just_finished = false;

    if playing.remove(unit) {
        debug!(%unit, remaining = playing.len(), "unit left the playing set");
        if playing.is_empty() {
            info!(%unit, "last playing unit ended; sequence finished");
            commands.push(CoreCommand::Notify(Lifecycle::End));
            run_just_finished = true;
        }
    } else {
        debug!(%unit, "end from a unit that is not playing; ignoring");
    }

    CoreStep {
        commands,
        run_just_finished,
    }
}

/// A managed unit was canceled: whatever waited on it stops waiting, but is
/// not started.
pub fn handle_unit_canceled(
    graph: &mut DependencyGraph,
    activation: &mut Activation,
    node: NodeId,
) -> CoreStep {
    let dropped = activation.abandon(graph, node);
    if dropped > 0 {
        warn!(
            unit = %graph.node(node).unit(),
            dropped,
            "unit canceled before satisfying its dependents"
        );
    }
    CoreStep::default()
}

fn start_unblocked(
    graph: &DependencyGraph,
    playing: &mut PlayingSet,
    phase: RunPhase,
    unblocked: Vec<NodeId>,
) -> Vec<CoreCommand> {
    let mut commands = Vec::with_capacity(unblocked.len());

    for node in unblocked {
        let unit = graph.node(node).unit();

        if phase != RunPhase::Running {
            debug!(%unit, ?phase, "run is winding down; not starting dependent");
            continue;
        }

        if playing.insert(unit) {
            debug!(%unit, "dependencies satisfied; starting unit");
            commands.push(CoreCommand::Start(unit));
        } else {
            warn!(%unit, "unit already playing; refusing to start it twice");
        }
    }

    commands
}
