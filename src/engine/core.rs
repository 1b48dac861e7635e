// src/engine/core.rs

//! Pure core state machine.
//!
//! [`SequencerCore`] owns the dependency graph and all per-run state. It
//! consumes [`UnitEvent`]s and returns [`CoreStep`]s describing which units
//! to start, end or cancel and which sequencer-level notifications to send.
//! It never touches a unit, so it can be tested without any.

use tracing::{debug, info, warn};

use crate::dag::{CycleDetected, DependencyGraph};
use crate::engine::activation::Activation;
use crate::engine::event_handlers::{
    handle_unit_canceled, handle_unit_ended, handle_unit_started, CoreCommand, CoreStep,
};
use crate::engine::playing::PlayingSet;
use crate::engine::{RunPhase, UnitEvent};
use crate::types::Lifecycle;

#[derive(Debug, Default)]
pub struct SequencerCore {
    graph: DependencyGraph,
    activation: Activation,
    playing: PlayingSet,
    phase: RunPhase,
    /// Monotonically increasing run counter.
    run_counter: u64,
}

impl SequencerCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == RunPhase::Idle
    }

    pub fn playing(&self) -> &PlayingSet {
        &self.playing
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// Number of runs started so far.
    pub fn run_count(&self) -> u64 {
        self.run_counter
    }

    /// Sort the graph, wire every dependency listener, then start the nodes
    /// that have no dependencies.
    ///
    /// Fails before touching any per-run state if the graph has a cycle.
    pub fn begin_run(&mut self) -> Result<CoreStep, CycleDetected> {
        if self.phase != RunPhase::Idle {
            warn!(
                run_id = self.run_counter,
                phase = ?self.phase,
                "start requested while a run is in progress; ignoring"
            );
            return Ok(CoreStep::default());
        }

        let order = self.graph.sorted()?.to_vec();

        self.run_counter += 1;
        self.graph.reset_runtime_dependencies();
        self.activation.reset();
        self.playing.clear();

        // Wire first, start afterwards: a ready node's start must not race
        // past a listener waiting for exactly that start.
        let mut ready = Vec::new();
        for id in order.iter().copied() {
            let node = self.graph.node(id);
            if node.is_root() {
                ready.push(node.unit());
            } else {
                for dep in node.dependencies() {
                    self.activation.subscribe(dep.node, dep.rule, id);
                }
            }
        }

        self.phase = RunPhase::Running;
        info!(
            run_id = self.run_counter,
            nodes = order.len(),
            ready = ready.len(),
            listeners = self.activation.listener_count(),
            "starting sequencer run"
        );

        let mut commands = Vec::with_capacity(ready.len() + 2);
        for unit in ready {
            self.playing.insert(unit);
            commands.push(CoreCommand::Start(unit));
        }
        commands.push(CoreCommand::Notify(Lifecycle::Start));

        let mut run_just_finished = false;
        if self.playing.is_empty() {
            debug!(run_id = self.run_counter, "nothing to play; run ends immediately");
            commands.push(CoreCommand::Notify(Lifecycle::End));
            self.finish_run();
            run_just_finished = true;
        }

        Ok(CoreStep {
            commands,
            run_just_finished,
        })
    }

    /// Handle a single unit notification.
    pub fn step(&mut self, event: UnitEvent) -> CoreStep {
        if self.phase == RunPhase::Idle {
            debug!(unit = %event.unit, lifecycle = %event.lifecycle, "no active run; ignoring unit event");
            return CoreStep::default();
        }

        let Some(node) = self.graph.node_for(event.unit) else {
            debug!(unit = %event.unit, "event from a unit outside the graph; ignoring");
            return CoreStep::default();
        };

        let step = match event.lifecycle {
            Lifecycle::Start => handle_unit_started(
                &mut self.graph,
                &mut self.activation,
                &mut self.playing,
                self.phase,
                node,
            ),
            Lifecycle::End => handle_unit_ended(
                &mut self.graph,
                &mut self.activation,
                &mut self.playing,
                self.phase,
                node,
            ),
            Lifecycle::Cancel => handle_unit_canceled(&mut self.graph, &mut self.activation, node),
            Lifecycle::Repeat => {
                debug!(unit = %event.unit, "unit repeated");
                CoreStep::default()
            }
        };

        if step.run_just_finished {
            self.finish_run();
        }
        step
    }

    /// Cancel every playing unit and empty the playing set.
    ///
    /// The cancel notification is only sent if something was playing. Call
    /// [`settle`](Self::settle) once the resulting unit events are processed.
    pub fn cancel_run(&mut self) -> CoreStep {
        if self.phase != RunPhase::Running {
            debug!(phase = ?self.phase, "cancel requested with no running sequence; ignoring");
            return CoreStep::default();
        }

        self.phase = RunPhase::Canceling;
        let units = self.playing.drain();
        info!(run_id = self.run_counter, playing = units.len(), "canceling sequence");

        let mut commands: Vec<CoreCommand> = units.iter().map(|u| CoreCommand::Cancel(*u)).collect();
        if !units.is_empty() {
            commands.push(CoreCommand::Notify(Lifecycle::Cancel));
        }

        CoreStep {
            commands,
            run_just_finished: false,
        }
    }

    /// Force-end every playing unit. Nothing else gets started afterwards.
    ///
    /// Call [`settle`](Self::settle) once the resulting unit events are
    /// processed.
    pub fn end_run(&mut self) -> CoreStep {
        if self.phase != RunPhase::Running {
            debug!(phase = ?self.phase, "end requested with no running sequence; ignoring");
            return CoreStep::default();
        }

        self.phase = RunPhase::Ending;
        info!(run_id = self.run_counter, playing = self.playing.len(), "ending sequence");

        CoreStep {
            commands: self
                .playing
                .as_slice()
                .iter()
                .map(|u| CoreCommand::End(*u))
                .collect(),
            run_just_finished: false,
        }
    }

    /// Close a run that is being canceled or ended.
    ///
    /// Units that never reported their end are dropped from the playing set
    /// and the end notification is sent, once.
    pub fn settle(&mut self) -> CoreStep {
        match self.phase {
            RunPhase::Canceling | RunPhase::Ending => {
                let leftover = self.playing.drain();
                if !leftover.is_empty() {
                    warn!(?leftover, "units did not report their end; clearing playing set");
                }
                self.finish_run();
                CoreStep {
                    commands: vec![CoreCommand::Notify(Lifecycle::End)],
                    run_just_finished: true,
                }
            }
            RunPhase::Idle | RunPhase::Running => CoreStep::default(),
        }
    }

    fn finish_run(&mut self) {
        debug!(
            run_id = self.run_counter,
            abandoned_listeners = self.activation.listener_count(),
            "run finished"
        );
        self.phase = RunPhase::Idle;
        self.activation.reset();
    }
}
