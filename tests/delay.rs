// tests/delay.rs

mod common;
use crate::common::{init_tracing, Call, FakeUnit, Journal};

use std::time::Duration;

use sequencer::{Animatable, Rule, Sequencer};

#[test]
fn after_delay_waits_for_a_synthetic_timer() {
    init_tracing();
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    let delay = seq
        .play(a)
        .after_delay(Duration::from_millis(100))
        .last_delay()
        .unwrap();

    let info = seq.units().find(|u| u.id == delay).unwrap();
    assert!(info.synthetic);
    assert_eq!(info.label, "delay(100ms)");
    assert_eq!(seq.dependencies_of(a), vec![(delay, Rule::After)]);
    assert_eq!(seq.nodes().len(), 2);

    seq.start().unwrap();
    assert!(journal.starts().is_empty());
    assert!(seq.unit(delay).unwrap().is_running());

    seq.tick(Duration::from_millis(50));
    assert!(journal.starts().is_empty());

    seq.tick(Duration::from_millis(50));
    assert_eq!(journal.starts(), vec!["a"]);
    assert_eq!(seq.playing(), &[a]);
}

#[test]
fn zero_delay_starts_the_anchor_at_once() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    seq.play(a).after_delay(Duration::ZERO);
    seq.start().unwrap();

    assert_eq!(journal.starts(), vec!["a"]);
}

#[test]
fn delay_units_can_anchor_other_constraints() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));
    let b = seq.add_named("b", FakeUnit::manual("b", &journal));

    let delay = seq
        .play(a)
        .after_delay(Duration::from_millis(30))
        .last_delay()
        .unwrap();
    seq.play(delay).with(b);

    seq.start().unwrap();
    assert_eq!(journal.starts(), vec!["b"]);

    seq.tick(Duration::from_millis(30));
    assert_eq!(journal.starts(), vec!["b", "a"]);
}

#[test]
fn delay_is_canceled_with_the_run() {
    let journal = Journal::new();
    let mut seq = Sequencer::new();
    let a = seq.add_named("a", FakeUnit::manual("a", &journal));

    let delay = seq
        .play(a)
        .after_delay(Duration::from_millis(30))
        .last_delay()
        .unwrap();

    seq.start().unwrap();
    seq.cancel();

    assert!(!seq.unit(delay).unwrap().is_running());
    assert_eq!(journal.count("a", Call::Start), 0);
    assert!(seq.is_idle());
}
