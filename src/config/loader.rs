// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawTimelineFile, TimelineFile};
use crate::errors::Result;

/// Load a timeline file without validating it.
///
/// Use [`load_and_validate`] unless you need to inspect a broken file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawTimelineFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let timeline: RawTimelineFile = toml::from_str(&contents)?;
    debug!(
        path = %path.display(),
        clips = timeline.clip.len(),
        groups = timeline.group.len(),
        "loaded timeline file"
    );

    Ok(timeline)
}

/// Load a timeline file and validate it:
///
/// - durations parse and the tick is non-zero,
/// - every `with` / `after` / group reference names a clip,
/// - no clip references itself,
/// - the constraints form no cycle.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TimelineFile> {
    let raw = load_from_path(&path)?;
    TimelineFile::try_from(raw)
}

/// `Timeline.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Timeline.toml")
}
