// src/listeners.rs

//! Sequencer-level listeners.
//!
//! These observe the sequence as a whole (not individual units): one start
//! notification per run, one end notification when the run finishes, a
//! cancel notification when a non-empty run is canceled.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::types::Lifecycle;

/// Observer of a whole sequence. Every method defaults to a no-op.
pub trait SequencerListener {
    fn on_start(&self) {}

    fn on_end(&self) {}

    fn on_cancel(&self) {}

    fn on_repeat(&self) {}
}

/// Handle returned by [`ListenerSet::add`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, Rc<dyn SequencerListener>)>,
}

/// Shared, cloneable set of [`SequencerListener`]s.
///
/// Clones share the same registry, so a listener can hold a clone and
/// add or remove listeners (itself included) while being notified. Such
/// changes only affect the next notification.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Rc<RefCell<Registry>>,
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Rc<dyn SequencerListener>) -> ListenerId {
        let mut registry = self.inner.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push((id, listener));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let before = registry.entries.len();
        registry.entries.retain(|(entry, _)| *entry != id);
        registry.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every listener registered at the time of the call.
    pub fn notify(&self, event: Lifecycle) {
        let snapshot: Vec<Rc<dyn SequencerListener>> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        debug!(%event, listeners = snapshot.len(), "notifying sequencer listeners");

        for listener in snapshot {
            match event {
                Lifecycle::Start => listener.on_start(),
                Lifecycle::End => listener.on_end(),
                Lifecycle::Cancel => listener.on_cancel(),
                Lifecycle::Repeat => listener.on_repeat(),
            }
        }
    }
}

/// Closure adapter: one callback receiving every notification.
pub struct FnListener<F>(F);

impl<F> SequencerListener for FnListener<F>
where
    F: Fn(Lifecycle),
{
    fn on_start(&self) {
        (self.0)(Lifecycle::Start)
    }

    fn on_end(&self) {
        (self.0)(Lifecycle::End)
    }

    fn on_cancel(&self) {
        (self.0)(Lifecycle::Cancel)
    }

    fn on_repeat(&self) {
        (self.0)(Lifecycle::Repeat)
    }
}

/// Wrap a closure as a listener.
pub fn listener_fn<F>(f: F) -> Rc<dyn SequencerListener>
where
    F: Fn(Lifecycle) + 'static,
{
    Rc::new(FnListener(f))
}
