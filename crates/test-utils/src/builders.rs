#![allow(dead_code)]

use sequencer::config::{GroupConfig, RawClipConfig, RawTimelineFile, TimelineFile};
use sequencer::GroupMode;

/// Builder for timeline files to simplify test setup.
pub struct TimelineBuilder {
    timeline: RawTimelineFile,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self {
            timeline: RawTimelineFile::default(),
        }
    }

    pub fn tick(mut self, tick: &str) -> Self {
        self.timeline.config.tick = tick.to_string();
        self
    }

    pub fn max_duration(mut self, max: &str) -> Self {
        self.timeline.config.max_duration = max.to_string();
        self
    }

    pub fn with_clip(mut self, name: &str, clip: RawClipConfig) -> Self {
        self.timeline.clip.insert(name.to_string(), clip);
        self
    }

    pub fn group(mut self, mode: GroupMode, clips: &[&str]) -> Self {
        self.timeline.group.push(GroupConfig {
            mode,
            clips: clips.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn build_raw(self) -> RawTimelineFile {
        self.timeline
    }

    pub fn build(self) -> TimelineFile {
        TimelineFile::try_from(self.timeline).expect("Failed to build valid timeline from builder")
    }
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `RawClipConfig`.
pub struct ClipConfigBuilder {
    clip: RawClipConfig,
}

impl ClipConfigBuilder {
    pub fn new(duration: &str) -> Self {
        Self {
            clip: RawClipConfig {
                duration: duration.to_string(),
                repeat: 0,
                with: vec![],
                after: vec![],
                delay: None,
            },
        }
    }

    pub fn repeat(mut self, repeat: u32) -> Self {
        self.clip.repeat = repeat;
        self
    }

    pub fn with(mut self, other: &str) -> Self {
        self.clip.with.push(other.to_string());
        self
    }

    pub fn after(mut self, other: &str) -> Self {
        self.clip.after.push(other.to_string());
        self
    }

    pub fn delay(mut self, delay: &str) -> Self {
        self.clip.delay = Some(delay.to_string());
        self
    }

    pub fn build(self) -> RawClipConfig {
        self.clip
    }
}
