// src/unit/mod.rs

//! The animatable unit contract consumed by the sequencer.
//!
//! Units never call back into the sequencer. Instead every command
//! (`start`, `end`, `cancel`, `tick`) receives an [`EventSink`], and the unit
//! pushes the lifecycle notifications it produces into it. The sequencer
//! queues those notifications and processes them once the command returns,
//! which is what makes synchronous chains (a unit that ends inside its own
//! `start`) safe.
//!
//! - [`registry`] stores the units owned by a sequencer.
//! - [`delay`] is the synthetic timer used by `after_delay`.

pub mod delay;
pub mod registry;

use std::fmt;
use std::time::Duration;

use crate::types::Lifecycle;

pub use delay::Delay;
pub use registry::{UnitInfo, UnitRegistry};

/// Something the sequencer can start, end and cancel.
///
/// Contract:
/// - `start` on an idle unit emits `Start` (and may emit `End` right away).
/// - `end` on a running unit emits `End`.
/// - `cancel` on a running unit emits `Cancel` followed by `End`.
/// - Calls on an idle unit emit nothing.
/// - `tick` advances the unit's clock; a unit reaching its natural end emits
///   `End`, a unit looping emits `Repeat`.
pub trait Animatable: fmt::Debug {
    fn start(&mut self, events: &mut EventSink);

    fn end(&mut self, events: &mut EventSink);

    fn cancel(&mut self, events: &mut EventSink);

    fn tick(&mut self, _delta: Duration, _events: &mut EventSink) {}

    fn is_running(&self) -> bool;
}

/// Collects the notifications a unit emits during one call.
#[derive(Debug, Default)]
pub struct EventSink {
    events: Vec<Lifecycle>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Lifecycle) {
        self.events.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events emitted so far, in order.
    pub fn events(&self) -> &[Lifecycle] {
        &self.events
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, Lifecycle> {
        self.events.drain(..)
    }
}
