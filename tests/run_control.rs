// tests/run_control.rs

mod common;
use crate::common::{init_tracing, Call, FakeUnit, Journal, Notes};

use std::time::Duration;

use sequencer::{Lifecycle, Rule, RunPhase, Sequencer};

#[test]
fn end_fires_once_after_every_unit_finished() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::timed("a", 10, &journal));
    let b = seq.add_named("b", FakeUnit::timed("b", 20, &journal));
    let c = seq.add_named("c", FakeUnit::timed("c", 30, &journal));
    let notes = Notes::attach(&mut seq);

    seq.play_together(&[a, b, c]);
    seq.start().unwrap();

    for _ in 0..5 {
        seq.tick(Duration::from_millis(10));
    }

    assert!(seq.is_idle());
    assert_eq!(notes.count(Lifecycle::End), 1);
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn dependent_started_on_end_keeps_the_run_alive() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::timed("a", 10, &journal));
    let b = seq.add_named("b", FakeUnit::timed("b", 10, &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(b).after(a);
    seq.start().unwrap();

    seq.tick(Duration::from_millis(10));
    assert_eq!(seq.playing(), &[b]);
    assert_eq!(notes.get(), vec![Lifecycle::Start]);

    seq.tick(Duration::from_millis(10));
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn cancel_stops_playing_units_and_never_starts_pending_ones() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a).before(b);
    seq.start().unwrap();
    seq.cancel();

    assert_eq!(journal.count("a", Call::Cancel), 1);
    assert_eq!(journal.count("b", Call::Start), 0);
    assert!(seq.is_idle());
    assert!(seq.playing().is_empty());
    assert_eq!(
        notes.get(),
        vec![Lifecycle::Start, Lifecycle::Cancel, Lifecycle::End]
    );

    // Late events from the canceled run are ignored.
    seq.report(a, Lifecycle::End);
    assert_eq!(journal.count("b", Call::Start), 0);
    assert_eq!(notes.count(Lifecycle::End), 1);
}

#[test]
fn cancel_when_idle_does_nothing() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a);
    seq.cancel();
    seq.end();

    assert!(journal.entries().is_empty());
    assert!(notes.get().is_empty());
}

#[test]
fn cancel_closes_the_run_even_if_units_stay_silent() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal).silent_on_stop());
    let notes = Notes::attach(&mut seq);

    seq.play(a);
    seq.start().unwrap();
    seq.cancel();

    assert!(seq.is_idle());
    assert_eq!(
        notes.get(),
        vec![Lifecycle::Start, Lifecycle::Cancel, Lifecycle::End]
    );
}

#[test]
fn end_finishes_playing_units_without_activating_dependents() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a).before(b);
    seq.start().unwrap();
    seq.end();

    assert_eq!(journal.count("a", Call::End), 1);
    assert_eq!(journal.count("b", Call::Start), 0);
    assert!(seq.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn end_closes_the_run_even_if_units_stay_silent() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal).silent_on_stop());
    let notes = Notes::attach(&mut seq);

    seq.play(a);
    seq.start().unwrap();
    seq.end();

    assert!(seq.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn start_while_running_is_ignored() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a);
    seq.start().unwrap();
    seq.start().unwrap();

    assert_eq!(seq.phase(), RunPhase::Running);
    assert_eq!(journal.count("a", Call::Start), 1);
    assert_eq!(seq.run_count(), 1);
    assert_eq!(notes.get(), vec![Lifecycle::Start]);
}

#[test]
fn empty_sequencer_starts_and_ends_at_once() {
    let mut seq = Sequencer::new();
    let notes = Notes::attach(&mut seq);

    seq.start().unwrap();

    assert!(seq.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn events_while_idle_are_ignored() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a).before(b);
    seq.report(a, Lifecycle::End);
    seq.tick(Duration::from_millis(16));

    assert!(journal.entries().is_empty());
    assert!(notes.get().is_empty());
}

#[test]
fn repeat_notifications_do_not_advance_the_run() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));

    seq.play(a).before(b);
    seq.start().unwrap();
    seq.report(a, Lifecycle::Repeat);

    assert_eq!(journal.count("b", Call::Start), 0);
    assert_eq!(seq.playing(), &[a]);
}

#[test]
fn canceled_prerequisite_blocks_a_dependent_with_other_prerequisites() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));
    let c = seq.add_named("c", FakeUnit::manual("c", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a).before(c);
    seq.play(b).before(c);
    seq.start().unwrap();

    seq.report(a, Lifecycle::Cancel);
    seq.report(a, Lifecycle::End);

    assert_eq!(seq.phase(), RunPhase::Running);
    assert_eq!(seq.playing(), &[b]);
    assert!(seq.is_blocked(c));
    assert_eq!(seq.pending_dependencies(c), vec![(b, Rule::After)]);

    seq.report(b, Lifecycle::End);

    assert_eq!(journal.count("c", Call::Start), 0);
    assert!(seq.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);
}

#[test]
fn cancel_of_one_unit_leaves_the_rest_of_the_run_playing() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::timed("b", 20, &journal));
    let after_a = seq.add_named("after_a", FakeUnit::instant("after_a", &journal));
    let after_b = seq.add_named("after_b", FakeUnit::instant("after_b", &journal));
    let notes = Notes::attach(&mut seq);

    seq.play(a).with(b);
    seq.play(after_a).after(a);
    seq.play(after_b).after(b);
    seq.start().unwrap();

    seq.report(a, Lifecycle::Cancel);
    seq.report(a, Lifecycle::End);
    assert_eq!(seq.playing(), &[b]);
    assert!(seq.is_blocked(after_a));
    assert!(!seq.is_blocked(after_b));

    seq.tick(Duration::from_millis(20));

    assert_eq!(journal.count("after_a", Call::Start), 0);
    assert_eq!(journal.count("after_b", Call::Start), 1);
    assert!(seq.is_idle());
    assert_eq!(notes.get(), vec![Lifecycle::Start, Lifecycle::End]);

    // The block only lasts for the run it happened in.
    seq.start().unwrap();
    assert!(!seq.is_blocked(after_a));
}
