// src/config/validate.rs

use std::collections::BTreeMap;
use std::time::Duration;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ClipConfig, RawClipConfig, RawSimSection, RawTimelineFile, SimSection, TimelineFile,
};
use crate::errors::{Result, SequencerError};
use crate::types::GroupMode;

impl TryFrom<RawTimelineFile> for TimelineFile {
    type Error = SequencerError;

    fn try_from(raw: RawTimelineFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_clips(&raw)?;
        let config = validate_sim_section(&raw.config)?;
        validate_references(&raw)?;
        validate_acyclic(&raw)?;

        let clip = raw
            .clip
            .iter()
            .map(|(name, clip)| Ok((name.clone(), validate_clip(name, clip)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(TimelineFile::new_unchecked(config, clip, raw.group))
    }
}

fn ensure_has_clips(raw: &RawTimelineFile) -> Result<()> {
    if raw.clip.is_empty() {
        return Err(SequencerError::ConfigError(
            "timeline must contain at least one [clip.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn duration_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| SequencerError::ConfigError(format!("{field}: {e}")))
}

fn validate_sim_section(section: &RawSimSection) -> Result<SimSection> {
    let tick = duration_field("[config].tick", &section.tick)?;
    if tick.is_zero() {
        return Err(SequencerError::ConfigError(
            "[config].tick must be greater than zero".to_string(),
        ));
    }

    let max_duration = duration_field("[config].max_duration", &section.max_duration)?;

    Ok(SimSection { tick, max_duration })
}

fn validate_clip(name: &str, clip: &RawClipConfig) -> Result<ClipConfig> {
    let duration = duration_field(&format!("[clip.{name}].duration"), &clip.duration)?;
    let delay = clip
        .delay
        .as_deref()
        .map(|d| duration_field(&format!("[clip.{name}].delay"), d))
        .transpose()?;

    Ok(ClipConfig {
        duration,
        repeat: clip.repeat,
        with: clip.with.clone(),
        after: clip.after.clone(),
        delay,
    })
}

fn validate_references(raw: &RawTimelineFile) -> Result<()> {
    for (name, clip) in raw.clip.iter() {
        for (field, refs) in [("with", &clip.with), ("after", &clip.after)] {
            for other in refs {
                if !raw.clip.contains_key(other) {
                    return Err(SequencerError::ConfigError(format!(
                        "clip '{name}' has unknown clip '{other}' in `{field}`"
                    )));
                }
                if other == name {
                    return Err(SequencerError::ConfigError(format!(
                        "clip '{name}' cannot reference itself in `{field}`"
                    )));
                }
            }
        }
    }

    for (i, group) in raw.group.iter().enumerate() {
        for other in group.clips.iter() {
            if !raw.clip.contains_key(other) {
                return Err(SequencerError::ConfigError(format!(
                    "group #{i} names unknown clip '{other}'"
                )));
            }
        }
    }

    Ok(())
}

/// Same edges the simulator builds: prerequisite -> dependent.
fn constraint_graph(raw: &RawTimelineFile) -> DiGraphMap<&str, ()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in raw.clip.keys() {
        graph.add_node(name.as_str());
    }

    for (name, clip) in raw.clip.iter() {
        for other in clip.with.iter().chain(clip.after.iter()) {
            graph.add_edge(other.as_str(), name.as_str(), ());
        }
    }

    for group in raw.group.iter() {
        match group.mode {
            GroupMode::Sequential => {
                for pair in group.clips.windows(2) {
                    graph.add_edge(pair[0].as_str(), pair[1].as_str(), ());
                }
            }
            GroupMode::Together => {
                if let Some((first, rest)) = group.clips.split_first() {
                    for other in rest {
                        graph.add_edge(first.as_str(), other.as_str(), ());
                    }
                }
            }
        }
    }

    graph
}

fn validate_acyclic(raw: &RawTimelineFile) -> Result<()> {
    let graph = constraint_graph(raw);

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let culprit = cycle.node_id();
            let mut members: Vec<String> = tarjan_scc(&graph)
                .into_iter()
                .find(|scc| scc.contains(&culprit))
                .unwrap_or_else(|| vec![culprit])
                .into_iter()
                .map(str::to_string)
                .collect();
            members.sort();
            Err(SequencerError::CyclicDependency(members))
        }
    }
}
