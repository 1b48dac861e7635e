// tests/absent_units.rs

mod common;
use crate::common::{init_tracing, FakeUnit, Journal};

use sequencer::{Lifecycle, Sequencer, SequencerError, UnitId};

/// A handle issued by another sequencer, out of range for a fresh one.
fn foreign_unit(journal: &Journal) -> UnitId {
    let mut other = Sequencer::new();
    other.add(FakeUnit::manual("o1", journal));
    other.add(FakeUnit::manual("o2", journal));
    other.add(FakeUnit::manual("o3", journal))
}

#[test]
fn handle_from_another_sequencer_never_aliases_a_local_unit() {
    init_tracing();
    let journal = Journal::new();
    let mut other = Sequencer::new();
    let theirs = other.add_named("theirs", FakeUnit::manual("theirs", &journal));
    let mut seq = Sequencer::new();
    let mine = seq.add_named("mine", FakeUnit::manual("mine", &journal));
    assert_eq!(theirs.index(), mine.index());
    assert_ne!(theirs, mine);

    let cursor = seq.play(theirs);
    assert!(cursor.is_noop());
    assert_eq!(cursor.anchor(), None);
    assert!(seq.nodes().is_empty());

    assert!(matches!(
        seq.try_play(theirs),
        Err(SequencerError::InvalidConstraint(_))
    ));
    seq.play(mine).with(theirs);
    assert!(seq.dependencies_of(mine).is_empty());
    assert!(seq.unit(theirs).is_none());
    assert_eq!(seq.label(theirs), "<absent>");

    seq.start().unwrap();
    seq.report(theirs, Lifecycle::End);
    assert_eq!(seq.playing(), &[mine]);
}

#[test]
fn play_with_an_absent_unit_is_a_noop() {
    init_tracing();
    let journal = Journal::new();
    let foreign = foreign_unit(&journal);
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    let mut cursor = seq.play(foreign);
    assert!(cursor.is_noop());
    assert_eq!(cursor.anchor(), None);
    cursor.with(a).before(a).after(a);

    assert!(seq.nodes().is_empty());

    let cursor = seq.play(None::<UnitId>);
    assert!(cursor.is_noop());
}

#[test]
fn relating_to_an_absent_unit_adds_no_edge() {
    let journal = Journal::new();
    let foreign = foreign_unit(&journal);
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    seq.play(a).with(foreign).after(foreign);

    assert_eq!(seq.nodes().len(), 1);
    assert!(seq.dependencies_of(a).is_empty());
    assert!(!seq.contains_node(foreign));
}

#[test]
fn try_play_rejects_an_absent_unit() {
    let journal = Journal::new();
    let foreign = foreign_unit(&journal);
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    assert!(matches!(
        seq.try_play(foreign),
        Err(SequencerError::InvalidConstraint(_))
    ));
    assert!(seq.try_play(a).is_ok());
    assert!(seq.contains_node(a));
}

#[test]
fn units_can_be_found_by_label() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let unnamed = seq.add(FakeUnit::manual("b", &journal));

    assert_eq!(seq.find("a").unwrap(), a);
    assert_eq!(seq.label(unnamed), unnamed.to_string());
    assert!(matches!(
        seq.find("missing"),
        Err(SequencerError::UnitNotFound(ref label)) if label == "missing"
    ));
}
