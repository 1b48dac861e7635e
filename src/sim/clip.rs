// src/sim/clip.rs

use std::time::Duration;

use crate::sim::timeline::Timeline;
use crate::types::Lifecycle;
use crate::unit::{Animatable, EventSink};

/// Fixed-duration animation driven by [`Animatable::tick`].
///
/// A clip with `repeat = n` plays `n + 1` loops and emits a repeat at each
/// loop boundary. A zero duration ends inside `start`.
#[derive(Debug, Clone)]
pub struct Clip {
    duration: Duration,
    repeat: u32,
    loops_done: u32,
    elapsed: Duration,
    running: bool,
    recorder: Option<(String, Timeline)>,
}

impl Clip {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            repeat: 0,
            loops_done: 0,
            elapsed: Duration::ZERO,
            running: false,
            recorder: None,
        }
    }

    pub fn with_repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Record every emitted event on `timeline` under `label`.
    pub fn recording(mut self, label: impl Into<String>, timeline: &Timeline) -> Self {
        self.recorder = Some((label.into(), timeline.clone()));
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn emit(&self, event: Lifecycle, events: &mut EventSink) {
        if let Some((label, timeline)) = &self.recorder {
            timeline.record(label, event);
        }
        events.emit(event);
    }
}

impl Animatable for Clip {
    fn start(&mut self, events: &mut EventSink) {
        if self.running {
            return;
        }
        self.running = true;
        self.loops_done = 0;
        self.elapsed = Duration::ZERO;
        self.emit(Lifecycle::Start, events);

        if self.duration.is_zero() {
            self.running = false;
            self.emit(Lifecycle::End, events);
        }
    }

    fn end(&mut self, events: &mut EventSink) {
        if !self.running {
            return;
        }
        self.running = false;
        self.emit(Lifecycle::End, events);
    }

    fn cancel(&mut self, events: &mut EventSink) {
        if !self.running {
            return;
        }
        self.running = false;
        self.emit(Lifecycle::Cancel, events);
        self.emit(Lifecycle::End, events);
    }

    fn tick(&mut self, delta: Duration, events: &mut EventSink) {
        if !self.running {
            return;
        }
        self.elapsed += delta;

        while self.running && self.elapsed >= self.duration {
            if self.loops_done < self.repeat {
                self.loops_done += 1;
                self.elapsed -= self.duration;
                self.emit(Lifecycle::Repeat, events);
            } else {
                self.running = false;
                self.elapsed = self.duration;
                self.emit(Lifecycle::End, events);
            }
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
