// src/engine/mod.rs

//! Run-time engine of the sequencer.
//!
//! This module ties together:
//! - the activation engine (one-shot dependency listeners, pending sets)
//! - the playing-set tracker (aggregate start / end / cancel of a run)
//! - the pure core state machine that consumes [`UnitEvent`]s and answers
//!   with [`CoreCommand`]s
//!
//! The core performs no calls on units. The [`Sequencer`](crate::Sequencer)
//! shell executes the commands and feeds the resulting events back in.

use crate::types::{Lifecycle, UnitId};

/// A lifecycle notification coming from one managed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitEvent {
    pub unit: UnitId,
    pub lifecycle: Lifecycle,
}

impl UnitEvent {
    pub fn new(unit: UnitId, lifecycle: Lifecycle) -> Self {
        Self { unit, lifecycle }
    }
}

/// Phase of the current run.
///
/// - `Idle`: no run in progress; unit events are ignored.
/// - `Running`: dependencies are being activated.
/// - `Canceling` / `Ending`: `cancel()` / `end()` is winding the run down; no
///   further unit gets started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Canceling,
    Ending,
}

impl Default for RunPhase {
    fn default() -> Self {
        RunPhase::Idle
    }
}

pub mod activation;
pub mod core;
pub mod event_handlers;
pub mod playing;

pub use activation::Activation;
pub use core::SequencerCore;
pub use event_handlers::{CoreCommand, CoreStep};
pub use playing::PlayingSet;
