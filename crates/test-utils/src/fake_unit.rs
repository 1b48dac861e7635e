use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sequencer::{Animatable, EventSink, Lifecycle};

/// A call the sequencer made on a fake unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Start,
    End,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub unit: String,
    pub call: Call,
}

/// Shared, ordered record of every call made on a set of fake units.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Entry>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, unit: &str, call: Call) {
        self.0.borrow_mut().push(Entry {
            unit: unit.to_string(),
            call,
        });
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.0.borrow().clone()
    }

    /// Labels of the units that were started, in start order.
    pub fn starts(&self) -> Vec<String> {
        self.of(Call::Start)
    }

    pub fn of(&self, call: Call) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.call == call)
            .map(|e| e.unit.clone())
            .collect()
    }

    pub fn count(&self, unit: &str, call: Call) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.unit == unit && e.call == call)
            .count()
    }

    /// Index of the first `call` on `unit`.
    pub fn position(&self, unit: &str, call: Call) -> Option<usize> {
        self.0
            .borrow()
            .iter()
            .position(|e| e.unit == unit && e.call == call)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// How a fake unit reaches its end after being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ends inside `start`.
    Instant,
    /// Ends once `tick` has accumulated this much time.
    Timed(Duration),
    /// Ends only when told to (`end`, `cancel`, or `Sequencer::report`).
    Manual,
}

/// Test double honouring the unit contract and journaling every call.
#[derive(Debug)]
pub struct FakeUnit {
    label: String,
    mode: Mode,
    journal: Journal,
    running: bool,
    elapsed: Duration,
    silent_stop: bool,
}

impl FakeUnit {
    pub fn new(label: &str, mode: Mode, journal: &Journal) -> Self {
        Self {
            label: label.to_string(),
            mode,
            journal: journal.clone(),
            running: false,
            elapsed: Duration::ZERO,
            silent_stop: false,
        }
    }

    pub fn instant(label: &str, journal: &Journal) -> Self {
        Self::new(label, Mode::Instant, journal)
    }

    pub fn timed(label: &str, millis: u64, journal: &Journal) -> Self {
        Self::new(label, Mode::Timed(Duration::from_millis(millis)), journal)
    }

    pub fn manual(label: &str, journal: &Journal) -> Self {
        Self::new(label, Mode::Manual, journal)
    }

    /// Stop on `end` / `cancel` without emitting anything, like a unit that
    /// breaks the contract.
    pub fn silent_on_stop(mut self) -> Self {
        self.silent_stop = true;
        self
    }
}

impl Animatable for FakeUnit {
    fn start(&mut self, events: &mut EventSink) {
        self.journal.push(&self.label, Call::Start);
        if self.running {
            return;
        }
        self.running = true;
        self.elapsed = Duration::ZERO;
        events.emit(Lifecycle::Start);

        if self.mode == Mode::Instant || self.mode == Mode::Timed(Duration::ZERO) {
            self.running = false;
            events.emit(Lifecycle::End);
        }
    }

    fn end(&mut self, events: &mut EventSink) {
        self.journal.push(&self.label, Call::End);
        if !self.running {
            return;
        }
        self.running = false;
        if !self.silent_stop {
            events.emit(Lifecycle::End);
        }
    }

    fn cancel(&mut self, events: &mut EventSink) {
        self.journal.push(&self.label, Call::Cancel);
        if !self.running {
            return;
        }
        self.running = false;
        if !self.silent_stop {
            events.emit(Lifecycle::Cancel);
            events.emit(Lifecycle::End);
        }
    }

    fn tick(&mut self, delta: Duration, events: &mut EventSink) {
        let Mode::Timed(duration) = self.mode else {
            return;
        };
        if !self.running {
            return;
        }
        self.elapsed += delta;
        if self.elapsed >= duration {
            self.running = false;
            events.emit(Lifecycle::End);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
