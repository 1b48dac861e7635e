// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::types::GroupMode;

/// Timeline file exactly as read from TOML.
///
/// ```toml
/// [config]
/// tick = "16ms"
/// max_duration = "60s"
///
/// [clip.fade]
/// duration = "300ms"
///
/// [clip.slide]
/// duration = "500ms"
/// after = ["fade"]
/// delay = "100ms"
///
/// [[group]]
/// mode = "together"
/// clips = ["fade", "glow"]
/// ```
///
/// Every section is optional at this stage; [`TimelineFile::try_from`]
/// decides what is actually acceptable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTimelineFile {
    /// Simulation settings from `[config]`.
    #[serde(default)]
    pub config: RawSimSection,

    /// Clips from `[clip.<name>]`, keyed by name.
    #[serde(default)]
    pub clip: BTreeMap<String, RawClipConfig>,

    /// `[[group]]` entries, applied in file order after the per-clip
    /// constraints.
    #[serde(default)]
    pub group: Vec<GroupConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSimSection {
    /// Step of the simulated clock.
    #[serde(default = "default_tick")]
    pub tick: String,

    /// Runs still going after this long are canceled.
    #[serde(default = "default_max_duration")]
    pub max_duration: String,
}

fn default_tick() -> String {
    "16ms".to_string()
}

fn default_max_duration() -> String {
    "60s".to_string()
}

impl Default for RawSimSection {
    fn default() -> Self {
        Self {
            tick: default_tick(),
            max_duration: default_max_duration(),
        }
    }
}

/// `[clip.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawClipConfig {
    pub duration: String,

    /// Extra loops after the first; each loop boundary emits a repeat.
    #[serde(default)]
    pub repeat: u32,

    /// Start this clip together with each of these clips.
    #[serde(default)]
    pub with: Vec<String>,

    /// Start this clip once all of these clips have ended.
    #[serde(default)]
    pub after: Vec<String>,

    /// Start this clip only after this much time has passed since the run
    /// started.
    #[serde(default)]
    pub delay: Option<String>,
}

/// `[[group]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    #[serde(default)]
    pub mode: GroupMode,

    pub clips: Vec<String>,
}

/// Validated timeline. Construct it with `TimelineFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct TimelineFile {
    pub config: SimSection,
    pub clip: BTreeMap<String, ClipConfig>,
    pub group: Vec<GroupConfig>,
}

impl TimelineFile {
    pub(crate) fn new_unchecked(
        config: SimSection,
        clip: BTreeMap<String, ClipConfig>,
        group: Vec<GroupConfig>,
    ) -> Self {
        Self {
            config,
            clip,
            group,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSection {
    pub tick: Duration,
    pub max_duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipConfig {
    pub duration: Duration,
    pub repeat: u32,
    pub with: Vec<String>,
    pub after: Vec<String>,
    pub delay: Option<Duration>,
}
