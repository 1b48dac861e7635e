// src/config/mod.rs

//! Timeline files: TOML descriptions of simulated clips and the constraints
//! between them.
//!
//! - [`model`] holds the raw (as deserialized) and validated types.
//! - [`loader`] reads files from disk.
//! - [`validate`] turns a raw file into a validated one.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ClipConfig, GroupConfig, RawClipConfig, RawSimSection, RawTimelineFile, SimSection,
    TimelineFile,
};
