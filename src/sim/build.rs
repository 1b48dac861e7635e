// src/sim/build.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::TimelineFile;
use crate::listeners::listener_fn;
use crate::sequencer::Sequencer;
use crate::sim::clip::Clip;
use crate::sim::timeline::Timeline;
use crate::types::{GroupMode, UnitId};

/// Label under which sequence-level events land on the timeline.
pub const SEQUENCE_LABEL: &str = "sequence";

/// A sequencer built from a timeline file.
#[derive(Debug)]
pub struct Scene {
    pub sequencer: Sequencer,
    /// Clip name to unit id.
    pub clips: BTreeMap<String, UnitId>,
    pub timeline: Timeline,
}

/// Register one recording [`Clip`] per `[clip.<name>]` (in name order) and
/// translate the file's constraints into `play` calls.
pub fn build_scene(cfg: &TimelineFile) -> Scene {
    let timeline = Timeline::new();
    let mut sequencer = Sequencer::new();
    let mut clips = BTreeMap::new();

    for (name, clip) in cfg.clip.iter() {
        let unit = Clip::new(clip.duration)
            .with_repeat(clip.repeat)
            .recording(name.as_str(), &timeline);
        let id = sequencer.add_named(name.as_str(), unit);
        sequencer.play(id);
        clips.insert(name.clone(), id);
    }

    // References were checked during validation; a stale name just skips.
    let ids = |names: &[String]| -> Vec<UnitId> {
        names.iter().filter_map(|n| clips.get(n).copied()).collect()
    };

    for (name, clip) in cfg.clip.iter() {
        let Some(&id) = clips.get(name) else { continue };

        for other in ids(&clip.with) {
            sequencer.play(other).with(id);
        }
        for other in ids(&clip.after) {
            sequencer.play(id).after(other);
        }
        if let Some(delay) = clip.delay {
            sequencer.play(id).after_delay(delay);
        }
    }

    for group in cfg.group.iter() {
        let members = ids(&group.clips);
        debug!(mode = ?group.mode, clips = ?group.clips, "applying group");
        match group.mode {
            GroupMode::Together => sequencer.play_together(&members),
            GroupMode::Sequential => sequencer.play_sequentially(&members),
        }
    }

    let recorder = timeline.clone();
    sequencer.add_listener(listener_fn(move |event| {
        recorder.record(SEQUENCE_LABEL, event)
    }));

    Scene {
        sequencer,
        clips,
        timeline,
    }
}
