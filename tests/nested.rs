// tests/nested.rs

mod common;
use crate::common::{init_tracing, Call, FakeUnit, Journal, Notes};

use std::time::Duration;

use sequencer::{Animatable, Lifecycle, Sequencer};

fn child_sequence(journal: &Journal) -> (Sequencer, Notes) {
    let mut child = Sequencer::new();
    let x = child.add_named("x", FakeUnit::timed("x", 10, journal));
    let y = child.add_named("y", FakeUnit::timed("y", 10, journal));
    child.play_sequentially(&[x, y]);
    let notes = Notes::attach(&mut child);
    (child, notes)
}

#[test]
fn nested_sequencer_behaves_like_a_unit() {
    init_tracing();
    let journal = Journal::new();
    let (child, child_notes) = child_sequence(&journal);

    let mut parent = Sequencer::new();
    let c = parent.add_named("child", child);
    let z = parent.add_named("z", FakeUnit::instant("z", &journal));
    let notes = Notes::attach(&mut parent);

    parent.play(c).before(z);
    parent.start().unwrap();

    assert_eq!(journal.starts(), vec!["x"]);
    assert!(parent.unit(c).unwrap().is_running());

    parent.tick(Duration::from_millis(10));
    assert_eq!(journal.starts(), vec!["x", "y"]);
    assert_eq!(journal.count("z", Call::Start), 0);

    parent.tick(Duration::from_millis(10));
    assert_eq!(journal.starts(), vec!["x", "y", "z"]);
    assert!(parent.is_idle());
    assert!(!parent.unit(c).unwrap().is_running());

    assert_eq!(child_notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn canceling_the_parent_cancels_the_child_run() {
    init_tracing();
    let journal = Journal::new();
    let (child, child_notes) = child_sequence(&journal);

    let mut parent = Sequencer::new();
    let c = parent.add_named("child", child);
    let z = parent.add_named("z", FakeUnit::instant("z", &journal));
    let notes = Notes::attach(&mut parent);

    parent.play(c).before(z);
    parent.start().unwrap();
    parent.cancel();

    assert_eq!(journal.count("x", Call::Cancel), 1);
    assert_eq!(journal.count("y", Call::Start), 0);
    assert_eq!(journal.count("z", Call::Start), 0);
    assert!(parent.is_idle());
    assert_eq!(
        child_notes.get(),
        vec![Lifecycle::Start, Lifecycle::Cancel, Lifecycle::End]
    );
    assert_eq!(
        notes.get(),
        vec![Lifecycle::Start, Lifecycle::Cancel, Lifecycle::End]
    );
}

#[test]
fn child_with_a_cycle_reports_itself_canceled() {
    init_tracing();
    let journal = Journal::new();
    let mut child = Sequencer::new();
    let x = child.add_named("x", FakeUnit::manual("x", &journal));
    let y = child.add_named("y", FakeUnit::manual("y", &journal));
    child.play(x).before(y);
    child.play(y).before(x);

    let mut parent = Sequencer::new();
    let c = parent.add_named("child", child);
    let z = parent.add_named("z", FakeUnit::instant("z", &journal));
    let notes = Notes::attach(&mut parent);

    parent.play(z).after(c);
    parent.start().unwrap();

    assert!(journal.entries().is_empty());
    assert!(parent.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn with_on_a_nested_sequencer_follows_its_start() {
    let journal = Journal::new();
    let (child, _child_notes) = child_sequence(&journal);

    let mut parent = Sequencer::new();
    let c = parent.add_named("child", child);
    let w = parent.add_named("w", FakeUnit::manual("w", &journal));

    parent.play(c).with(w);
    parent.start().unwrap();

    assert_eq!(journal.starts(), vec!["x", "w"]);
}
