// src/unit/delay.rs

use std::time::Duration;

use crate::types::Lifecycle;
use crate::unit::{Animatable, EventSink};

/// A unit with no visible effect that ends after `duration` of ticks.
///
/// This is what `Constraint::after_delay` inserts in front of its anchor.
#[derive(Debug, Clone)]
pub struct Delay {
    duration: Duration,
    elapsed: Duration,
    running: bool,
}

impl Delay {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Animatable for Delay {
    fn start(&mut self, events: &mut EventSink) {
        if self.running {
            return;
        }
        self.running = true;
        self.elapsed = Duration::ZERO;
        events.emit(Lifecycle::Start);

        if self.duration.is_zero() {
            self.running = false;
            events.emit(Lifecycle::End);
        }
    }

    fn end(&mut self, events: &mut EventSink) {
        if self.running {
            self.running = false;
            self.elapsed = self.duration;
            events.emit(Lifecycle::End);
        }
    }

    fn cancel(&mut self, events: &mut EventSink) {
        if self.running {
            self.running = false;
            events.emit(Lifecycle::Cancel);
            events.emit(Lifecycle::End);
        }
    }

    fn tick(&mut self, delta: Duration, events: &mut EventSink) {
        if !self.running {
            return;
        }
        self.elapsed += delta;
        if self.elapsed >= self.duration {
            self.running = false;
            events.emit(Lifecycle::End);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
