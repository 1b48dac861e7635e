// src/sequencer.rs

//! The [`Sequencer`]: owns the units, builds the dependency graph through
//! [`Constraint`] cursors and runs it.
//!
//! This is the shell around [`SequencerCore`]. The core decides, the shell
//! calls units and feeds what they emit back into the core through a FIFO
//! queue until nothing is left to process.

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::control::{ControlQueue, ControlRequest, SequencerHandle};
use crate::dag::{Constraint, CycleDetected, Dependency, Node};
use crate::engine::{CoreCommand, CoreStep, RunPhase, SequencerCore, UnitEvent};
use crate::errors::{Result, SequencerError};
use crate::listeners::{ListenerId, ListenerSet, SequencerListener};
use crate::types::{Lifecycle, Rule, UnitId};
use crate::unit::{Animatable, EventSink, UnitInfo, UnitRegistry};

#[derive(Debug, Clone, Copy)]
enum UnitCall {
    Start,
    End,
    Cancel,
    Tick(Duration),
}

/// Dependency scheduler over a set of [`Animatable`] units.
///
/// ```no_run
/// # use sequencer::{Sequencer, sim::Clip};
/// # use std::time::Duration;
/// let mut seq = Sequencer::new();
/// let fade = seq.add_named("fade", Clip::new(Duration::from_millis(300)));
/// let slide = seq.add_named("slide", Clip::new(Duration::from_millis(500)));
/// seq.play(fade).before(slide);
/// seq.start()?;
/// # Ok::<(), sequencer::SequencerError>(())
/// ```
#[derive(Debug, Default)]
pub struct Sequencer {
    core: SequencerCore,
    units: UnitRegistry,
    listeners: ListenerSet,
    queue: VecDeque<UnitEvent>,
    control: ControlQueue,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit. It does not take part in a run until it appears in a
    /// constraint.
    pub fn add(&mut self, unit: impl Animatable + 'static) -> UnitId {
        self.units.insert(None, Box::new(unit))
    }

    pub fn add_named(&mut self, label: impl Into<String>, unit: impl Animatable + 'static) -> UnitId {
        self.units.insert(Some(label.into()), Box::new(unit))
    }

    /// Put `unit` in the graph and return a cursor anchored on it.
    ///
    /// An absent unit yields a no-op cursor (and a warning).
    pub fn play(&mut self, unit: impl Into<Option<UnitId>>) -> Constraint<'_> {
        Constraint::new(self.core.graph_mut(), &mut self.units, unit.into())
    }

    /// Like [`play`](Self::play), but an absent unit is an error.
    pub fn try_play(&mut self, unit: UnitId) -> Result<Constraint<'_>> {
        if !self.units.contains(unit) {
            return Err(SequencerError::InvalidConstraint(format!(
                "{unit} is not registered with this sequencer"
            )));
        }
        Ok(self.play(unit))
    }

    /// Play all `units` at the same time as the first one.
    pub fn play_together(&mut self, units: &[UnitId]) {
        let Some((first, rest)) = units.split_first() else {
            return;
        };
        let mut cursor = self.play(*first);
        for unit in rest {
            cursor.with(*unit);
        }
    }

    /// Play `units` one after the other.
    pub fn play_sequentially(&mut self, units: &[UnitId]) {
        match units {
            [] => {}
            [only] => {
                self.play(*only);
            }
            _ => {
                for pair in units.windows(2) {
                    self.play(pair[0]).before(pair[1]);
                }
            }
        }
    }

    /// Start a run.
    ///
    /// Fails with [`SequencerError::CyclicDependency`] (and starts nothing)
    /// if the constraints contain a cycle. Starting while a run is in
    /// progress is a no-op.
    pub fn start(&mut self) -> Result<()> {
        let notes = self.start_run()?;
        self.publish(notes);
        Ok(())
    }

    /// Force-end every playing unit. Pending units are never started.
    pub fn end(&mut self) {
        let notes = self.end_run();
        self.publish(notes);
    }

    /// Cancel every playing unit. Pending units are never started.
    pub fn cancel(&mut self) {
        let notes = self.cancel_run();
        self.publish(notes);
    }

    /// Advance the clock of every playing unit by `delta`.
    pub fn tick(&mut self, delta: Duration) {
        let notes = self.tick_run(delta);
        self.publish(notes);
    }

    /// Inject a lifecycle notification on behalf of `unit`, for units driven
    /// by a clock outside the sequencer.
    pub fn report(&mut self, unit: UnitId, lifecycle: Lifecycle) {
        self.queue.push_back(UnitEvent::new(unit, lifecycle));
        let mut notes = Vec::new();
        self.drain_queue(&mut notes);
        self.publish(notes);
    }

    /// Handle for controlling this sequencer from a listener.
    ///
    /// ```no_run
    /// # use sequencer::{listener_fn, Lifecycle, Sequencer};
    /// let mut seq = Sequencer::new();
    /// let handle = seq.handle();
    /// seq.add_listener(listener_fn(move |event| {
    ///     if event == Lifecycle::End {
    ///         handle.start();
    ///     }
    /// }));
    /// ```
    pub fn handle(&self) -> SequencerHandle {
        self.control.handle()
    }

    /// Serve requests sent through a [`SequencerHandle`] outside of a
    /// notification. Requests sent from listeners are served without this.
    pub fn serve_requests(&mut self) {
        self.publish(Vec::new());
    }

    pub fn add_listener(&mut self, listener: Rc<dyn SequencerListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Shared handle to the listener set, usable from inside a listener.
    pub fn listeners(&self) -> ListenerSet {
        self.listeners.clone()
    }

    pub fn phase(&self) -> RunPhase {
        self.core.phase()
    }

    pub fn is_idle(&self) -> bool {
        self.core.is_idle()
    }

    /// Units playing right now, in start order.
    pub fn playing(&self) -> &[UnitId] {
        self.core.playing().as_slice()
    }

    pub fn run_count(&self) -> u64 {
        self.core.run_count()
    }

    /// Whether `unit` lost a prerequisite to a cancel in the current run and
    /// will therefore not start.
    pub fn is_blocked(&self, unit: UnitId) -> bool {
        self.core
            .graph()
            .node_for(unit)
            .is_some_and(|node| self.core.activation().is_blocked(node))
    }

    pub fn units(&self) -> impl Iterator<Item = UnitInfo<'_>> {
        self.units.iter()
    }

    pub fn unit(&self, id: UnitId) -> Option<&dyn Animatable> {
        self.units.get(id)
    }

    pub fn label(&self, id: UnitId) -> &str {
        self.units.label(id)
    }

    /// Look a unit up by label. Synthetic units are skipped.
    pub fn find(&self, label: &str) -> Result<UnitId> {
        self.units
            .iter()
            .find(|info| !info.synthetic && info.label == label)
            .map(|info| info.id)
            .ok_or_else(|| SequencerError::UnitNotFound(label.to_string()))
    }

    /// Graph nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        self.core.graph().raw_nodes()
    }

    pub fn contains_node(&self, unit: UnitId) -> bool {
        self.core.graph().node_for(unit).is_some()
    }

    pub fn needs_sort(&self) -> bool {
        self.core.graph().needs_sort()
    }

    /// The start order of the graph, recomputed only after an edit.
    pub fn sorted_units(&mut self) -> Result<Vec<UnitId>> {
        let order = self.core.graph_mut().sorted().map(|order| order.to_vec());
        match order {
            Ok(order) => {
                let graph = self.core.graph();
                Ok(order.into_iter().map(|id| graph.node(id).unit()).collect())
            }
            Err(cycle) => Err(self.cycle_error(cycle)),
        }
    }

    /// Declared dependencies of `unit` as `(prerequisite, rule)` pairs.
    pub fn dependencies_of(&self, unit: UnitId) -> Vec<(UnitId, Rule)> {
        self.edges_of(unit, Node::dependencies)
    }

    /// Dependencies of `unit` still unsatisfied in the current (or last) run.
    pub fn pending_dependencies(&self, unit: UnitId) -> Vec<(UnitId, Rule)> {
        self.edges_of(unit, Node::pending_dependencies)
    }

    fn edges_of(
        &self,
        unit: UnitId,
        select: impl Fn(&Node) -> &[Dependency],
    ) -> Vec<(UnitId, Rule)> {
        let graph = self.core.graph();
        graph
            .node_for(unit)
            .map(|id| {
                select(graph.node(id))
                    .iter()
                    .map(|dep| (graph.node(dep.node).unit(), dep.rule))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn start_run(&mut self) -> Result<Vec<Lifecycle>> {
        let step = match self.core.begin_run() {
            Ok(step) => step,
            Err(cycle) => {
                let err = self.cycle_error(cycle);
                warn!(%err, "refusing to start");
                return Err(err);
            }
        };

        let mut notes = Vec::new();
        self.drive(step, &mut notes);
        Ok(notes)
    }

    fn end_run(&mut self) -> Vec<Lifecycle> {
        let mut notes = Vec::new();
        let step = self.core.end_run();
        self.drive(step, &mut notes);
        let step = self.core.settle();
        self.drive(step, &mut notes);
        notes
    }

    fn cancel_run(&mut self) -> Vec<Lifecycle> {
        let mut notes = Vec::new();
        let step = self.core.cancel_run();
        self.drive(step, &mut notes);
        let step = self.core.settle();
        self.drive(step, &mut notes);
        notes
    }

    fn tick_run(&mut self, delta: Duration) -> Vec<Lifecycle> {
        let mut notes = Vec::new();
        if self.core.is_idle() {
            return notes;
        }

        // Units started during this tick only see the next one.
        let playing = self.core.playing().as_slice().to_vec();
        for unit in playing {
            self.call(unit, UnitCall::Tick(delta));
        }
        self.drain_queue(&mut notes);
        notes
    }

    /// Execute `step`, then process unit events until the queue is empty.
    fn drive(&mut self, step: CoreStep, notes: &mut Vec<Lifecycle>) {
        self.execute(step, notes);
        self.drain_queue(notes);
    }

    fn drain_queue(&mut self, notes: &mut Vec<Lifecycle>) {
        while let Some(event) = self.queue.pop_front() {
            debug!(
                unit = %self.units.label(event.unit),
                lifecycle = %event.lifecycle,
                "processing unit event"
            );
            let step = self.core.step(event);
            self.execute(step, notes);
        }
    }

    fn execute(&mut self, step: CoreStep, notes: &mut Vec<Lifecycle>) {
        for command in step.commands {
            match command {
                CoreCommand::Start(unit) => self.call(unit, UnitCall::Start),
                CoreCommand::End(unit) => self.call(unit, UnitCall::End),
                CoreCommand::Cancel(unit) => self.call(unit, UnitCall::Cancel),
                CoreCommand::Notify(event) => notes.push(event),
            }
        }
    }

    fn call(&mut self, unit: UnitId, call: UnitCall) {
        let Some(target) = self.units.get_mut(unit) else {
            warn!(%unit, ?call, "command for a unit this sequencer does not own");
            return;
        };

        let mut sink = EventSink::new();
        match call {
            UnitCall::Start => target.start(&mut sink),
            UnitCall::End => target.end(&mut sink),
            UnitCall::Cancel => target.cancel(&mut sink),
            UnitCall::Tick(delta) => target.tick(delta, &mut sink),
        }

        if !matches!(call, UnitCall::Tick(_)) {
            debug!(unit = %self.units.label(unit), ?call, emitted = sink.len(), "called unit");
        }

        for lifecycle in sink.drain() {
            self.queue.push_back(UnitEvent::new(unit, lifecycle));
        }
    }

    /// Deliver `notes`, then serve handle requests until none are left.
    /// Returns every notification delivered, including those of served
    /// requests.
    fn publish(&mut self, mut notes: Vec<Lifecycle>) -> Vec<Lifecycle> {
        let mut delivered = Vec::new();
        loop {
            for event in &notes {
                info!(%event, "sequence notification");
                self.listeners.notify(*event);
            }
            delivered.append(&mut notes);

            let Some(request) = self.control.next() else {
                break;
            };
            debug!(?request, "serving handle request");
            notes = match request {
                // a failed start was already logged by start_run
                ControlRequest::Start => self.start_run().unwrap_or_default(),
                ControlRequest::End => self.end_run(),
                ControlRequest::Cancel => self.cancel_run(),
            };
        }
        delivered
    }

    fn forward(&mut self, notes: Vec<Lifecycle>, events: &mut EventSink) {
        for event in self.publish(notes) {
            events.emit(event);
        }
    }

    fn cycle_error(&self, cycle: CycleDetected) -> SequencerError {
        SequencerError::CyclicDependency(
            cycle
                .units
                .iter()
                .map(|unit| self.units.label(*unit).to_string())
                .collect(),
        )
    }
}

/// A sequencer is itself a unit: its sequence-level notifications are what
/// the parent sees.
impl Animatable for Sequencer {
    fn start(&mut self, events: &mut EventSink) {
        match self.start_run() {
            Ok(notes) => self.forward(notes, events),
            Err(err) => {
                error!(%err, "nested sequencer cannot start; reporting it as canceled");
                events.emit(Lifecycle::Cancel);
                events.emit(Lifecycle::End);
            }
        }
    }

    fn end(&mut self, events: &mut EventSink) {
        let notes = self.end_run();
        self.forward(notes, events);
    }

    fn cancel(&mut self, events: &mut EventSink) {
        let notes = self.cancel_run();
        self.forward(notes, events);
    }

    fn tick(&mut self, delta: Duration, events: &mut EventSink) {
        let notes = self.tick_run(delta);
        self.forward(notes, events);
    }

    fn is_running(&self) -> bool {
        !self.core.is_idle()
    }
}
