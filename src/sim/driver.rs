// src/sim/driver.rs

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::SimSection;
use crate::errors::Result;
use crate::sequencer::Sequencer;
use crate::sim::timeline::Timeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    /// Clock step.
    pub tick: Duration,
    /// The run is canceled once the clock reaches this.
    pub max_duration: Duration,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(16),
            max_duration: Duration::from_secs(60),
        }
    }
}

impl From<&SimSection> for SimOptions {
    fn from(section: &SimSection) -> Self {
        Self {
            tick: section.tick,
            max_duration: section.max_duration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimReport {
    /// Clock time when the run finished.
    pub elapsed: Duration,
    pub ticks: u64,
    /// Whether the run was canceled (time cap or Ctrl-C).
    pub canceled: bool,
}

/// Start `sequencer` and step a virtual clock until the run finishes.
pub fn run_virtual(
    sequencer: &mut Sequencer,
    timeline: &Timeline,
    options: &SimOptions,
) -> Result<SimReport> {
    sequencer.start()?;

    let mut ticks = 0;
    let mut canceled = false;

    while !sequencer.is_idle() {
        if timeline.now() >= options.max_duration {
            warn!(
                max_duration_ms = options.max_duration.as_millis() as u64,
                "sequence exceeded max_duration; canceling"
            );
            sequencer.cancel();
            canceled = true;
            break;
        }

        timeline.advance(options.tick);
        sequencer.tick(options.tick);
        ticks += 1;
    }

    let report = SimReport {
        elapsed: timeline.now(),
        ticks,
        canceled,
    };
    info!(?report, "virtual run finished");
    Ok(report)
}

/// Like [`run_virtual`], but the clock follows wall time. Ctrl-C cancels
/// the sequence.
pub async fn run_realtime(
    sequencer: &mut Sequencer,
    timeline: &Timeline,
    options: &SimOptions,
) -> Result<SimReport> {
    sequencer.start()?;

    let mut interval = tokio::time::interval(options.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last = Instant::now();
    let mut ticks = 0;
    let mut canceled = false;

    while !sequencer.is_idle() {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let delta = now - last;
                last = now;

                timeline.advance(delta);
                sequencer.tick(delta);
                ticks += 1;

                if !sequencer.is_idle() && timeline.now() >= options.max_duration {
                    warn!("sequence exceeded max_duration; canceling");
                    sequencer.cancel();
                    canceled = true;
                }
            }
            res = &mut ctrl_c => {
                match res {
                    Ok(()) => info!("Ctrl-C received; canceling sequence"),
                    Err(e) => warn!(error = %e, "failed to listen for Ctrl+C; canceling sequence"),
                }
                sequencer.cancel();
                canceled = true;
            }
        }
    }

    Ok(SimReport {
        elapsed: timeline.now(),
        ticks,
        canceled,
    })
}
