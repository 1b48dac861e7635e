// src/lib.rs

//! Animation dependency scheduler.
//!
//! Units are registered with a [`Sequencer`], related to each other through
//! [`Constraint`] cursors (`with`, `before`, `after`, `after_delay`) and then
//! run: units without dependencies start at once, every other unit starts
//! exactly once, as soon as all of its prerequisites have started or ended.

pub mod cli;
pub mod config;
pub mod control;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod listeners;
pub mod logging;
pub mod sequencer;
pub mod sim;
pub mod types;
pub mod unit;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::duration::format_duration;
use crate::config::loader::load_and_validate;
use crate::config::TimelineFile;
use crate::sim::{build_scene, run_realtime, run_virtual, SimOptions};

pub use crate::control::{ControlRequest, SequencerHandle};
pub use crate::dag::Constraint;
pub use crate::engine::RunPhase;
pub use crate::errors::SequencerError;
pub use crate::listeners::{listener_fn, ListenerId, ListenerSet, SequencerListener};
pub use crate::sequencer::Sequencer;
pub use crate::types::{GroupMode, Lifecycle, Rule, UnitId};
pub use crate::unit::{Animatable, Delay, EventSink, UnitInfo};

/// High-level entry point used by `main.rs`.
///
/// Loads and validates the timeline, builds the scene, then either prints
/// it (`--dry-run`) or plays it and prints the resulting timeline.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let mut scene = build_scene(&cfg);
    let options = SimOptions::from(&cfg.config);
    info!(
        clips = scene.clips.len(),
        realtime = args.realtime,
        tick_ms = options.tick.as_millis() as u64,
        "playing timeline"
    );

    let report = if args.realtime {
        run_realtime(&mut scene.sequencer, &scene.timeline, &options).await?
    } else {
        run_virtual(&mut scene.sequencer, &scene.timeline, &options)?
    };

    print!("{}", scene.timeline.render());
    if report.canceled {
        println!("(canceled at t={}ms)", report.elapsed.as_millis());
    }
    Ok(())
}

/// Print clips, constraints and the start order.
fn print_dry_run(cfg: &TimelineFile) -> Result<()> {
    println!("sequencer dry-run");
    println!("  config.tick = {}", format_duration(cfg.config.tick));
    println!(
        "  config.max_duration = {}",
        format_duration(cfg.config.max_duration)
    );
    println!();

    println!("clips ({}):", cfg.clip.len());
    for (name, clip) in cfg.clip.iter() {
        println!("  - {name}");
        println!("      duration: {}", format_duration(clip.duration));
        if clip.repeat > 0 {
            println!("      repeat: {}", clip.repeat);
        }
        if !clip.with.is_empty() {
            println!("      with: {:?}", clip.with);
        }
        if !clip.after.is_empty() {
            println!("      after: {:?}", clip.after);
        }
        if let Some(delay) = clip.delay {
            println!("      delay: {}", format_duration(delay));
        }
    }

    if !cfg.group.is_empty() {
        println!();
        println!("groups ({}):", cfg.group.len());
        for group in cfg.group.iter() {
            println!("  - {:?} {:?}", group.mode, group.clips);
        }
    }

    let mut scene = build_scene(cfg);
    let order = scene.sequencer.sorted_units()?;
    println!();
    println!("start order:");
    for (i, unit) in order.iter().enumerate() {
        let deps = scene.sequencer.dependencies_of(*unit);
        if deps.is_empty() {
            println!("  {i}. {}", scene.sequencer.label(*unit));
        } else {
            let deps: Vec<String> = deps
                .iter()
                .map(|(other, rule)| format!("{rule:?} {}", scene.sequencer.label(*other)))
                .collect();
            println!(
                "  {i}. {} (waits for: {})",
                scene.sequencer.label(*unit),
                deps.join(", ")
            );
        }
    }

    debug!("dry-run complete (nothing played)");
    Ok(())
}
