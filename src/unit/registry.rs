// src/unit/registry.rs

//! Owned storage for the units of one sequencer.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::UnitId;
use crate::unit::Animatable;

#[derive(Debug)]
struct Slot {
    label: String,
    synthetic: bool,
    unit: Box<dyn Animatable>,
}

/// Read-only view of a registered unit.
#[derive(Debug, Clone, Copy)]
pub struct UnitInfo<'a> {
    pub id: UnitId,
    pub label: &'a str,
    /// Created by the sequencer itself (e.g. an `after_delay` timer).
    pub synthetic: bool,
}

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Units indexed by [`UnitId`]. Ids are never reused, and ids issued by
/// another registry are never found here.
#[derive(Debug)]
pub struct UnitRegistry {
    owner: u64,
    slots: Vec<Slot>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn insert(&mut self, label: Option<String>, unit: Box<dyn Animatable>) -> UnitId {
        self.push(label, unit, false)
    }

    pub(crate) fn insert_synthetic(&mut self, label: String, unit: Box<dyn Animatable>) -> UnitId {
        self.push(Some(label), unit, true)
    }

    fn push(&mut self, label: Option<String>, unit: Box<dyn Animatable>, synthetic: bool) -> UnitId {
        let id = self.id_at(self.slots.len());
        let label = label.unwrap_or_else(|| id.to_string());
        self.slots.push(Slot {
            label,
            synthetic,
            unit,
        });
        id
    }

    fn id_at(&self, index: usize) -> UnitId {
        UnitId {
            owner: self.owner,
            index,
        }
    }

    fn slot(&self, id: UnitId) -> Option<&Slot> {
        if id.owner != self.owner {
            return None;
        }
        self.slots.get(id.index)
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.slot(id).is_some()
    }

    /// Label of `id`, or `"<absent>"` for ids this registry never issued.
    pub fn label(&self, id: UnitId) -> &str {
        self.slot(id)
            .map(|s| s.label.as_str())
            .unwrap_or("<absent>")
    }

    pub fn info(&self, id: UnitId) -> Option<UnitInfo<'_>> {
        self.slot(id).map(|s| UnitInfo {
            id,
            label: &s.label,
            synthetic: s.synthetic,
        })
    }

    pub fn get(&self, id: UnitId) -> Option<&dyn Animatable> {
        self.slot(id).map(|s| s.unit.as_ref())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut (dyn Animatable + 'static)> {
        if id.owner != self.owner {
            return None;
        }
        self.slots.get_mut(id.index).map(|s| s.unit.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitInfo<'_>> {
        self.slots.iter().enumerate().map(|(i, s)| UnitInfo {
            id: self.id_at(i),
            label: &s.label,
            synthetic: s.synthetic,
        })
    }
}
