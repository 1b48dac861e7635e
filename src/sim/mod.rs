// src/sim/mod.rs

//! Simulated clips and the clock that drives them.
//!
//! Used by the binary to play a timeline file, and by tests that want
//! deterministic timing without hand-written units.

pub mod build;
pub mod clip;
pub mod driver;
pub mod timeline;

pub use build::{build_scene, Scene};
pub use clip::Clip;
pub use driver::{run_realtime, run_virtual, SimOptions, SimReport};
pub use timeline::{Timeline, TimelineEntry};
