#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sequencer::{listener_fn, Lifecycle, Sequencer};

pub use sequencer_test_utils::builders;
pub use sequencer_test_utils::fake_unit::{Call, FakeUnit, Journal};
pub use sequencer_test_utils::init_tracing;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Sequence-level notifications received by a listener on `seq`.
#[derive(Debug, Clone, Default)]
pub struct Notes(Rc<RefCell<Vec<Lifecycle>>>);

impl Notes {
    pub fn attach(seq: &mut Sequencer) -> Self {
        let notes = Self::default();
        let sink = notes.0.clone();
        seq.add_listener(listener_fn(move |event| sink.borrow_mut().push(event)));
        notes
    }

    pub fn get(&self) -> Vec<Lifecycle> {
        self.0.borrow().clone()
    }

    pub fn count(&self, event: Lifecycle) -> usize {
        self.0.borrow().iter().filter(|e| **e == event).count()
    }
}
