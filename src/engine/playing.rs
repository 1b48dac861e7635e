// src/engine/playing.rs

use crate::types::UnitId;

/// Units currently running under one sequencer run, in start order.
///
/// A unit enters the set when the core decides to start it and leaves it
/// when the unit reports its end. The run is over when the set drains.
#[derive(Debug, Clone, Default)]
pub struct PlayingSet {
    units: Vec<UnitId>,
}

impl PlayingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the unit was already playing.
    pub fn insert(&mut self, unit: UnitId) -> bool {
        if self.units.contains(&unit) {
            return false;
        }
        self.units.push(unit);
        true
    }

    /// Returns `false` if the unit was not playing.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        match self.units.iter().position(|u| *u == unit) {
            Some(pos) => {
                self.units.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn as_slice(&self) -> &[UnitId] {
        &self.units
    }

    /// Take every unit out of the set, leaving it empty.
    pub fn drain(&mut self) -> Vec<UnitId> {
        std::mem::take(&mut self.units)
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }
}
