use std::collections::HashMap;

use proptest::prelude::*;
use sequencer::{Lifecycle, Sequencer, SequencerError, UnitId};
use sequencer_test_utils::fake_unit::{Call, FakeUnit, Journal};

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: usize,
    to: usize,
    with: bool,
}

fn edge_strategy(max_units: usize) -> impl Strategy<Value = (usize, Vec<Edge>)> {
    (1..=max_units).prop_flat_map(|n| {
        let edges = proptest::collection::vec(
            (0..n, 0..n, any::<bool>()).prop_map(|(from, to, with)| Edge { from, to, with }),
            0..(n * 2),
        );
        (Just(n), edges)
    })
}

/// Build a sequencer over `n` instant units. Only edges from a lower to a
/// higher index are kept, so the graph is acyclic.
fn acyclic(n: usize, edges: &[Edge], journal: &Journal) -> (Sequencer, Vec<UnitId>) {
    let mut seq = Sequencer::new();
    let units: Vec<UnitId> = (0..n)
        .map(|i| {
            let label = format!("u{i}");
            seq.add_named(label.as_str(), FakeUnit::instant(&label, journal))
        })
        .collect();

    for unit in units.iter() {
        seq.play(*unit);
    }
    for edge in edges.iter().filter(|e| e.from < e.to) {
        let mut cursor = seq.play(units[edge.from]);
        if edge.with {
            cursor.with(units[edge.to]);
        } else {
            cursor.before(units[edge.to]);
        }
    }
    (seq, units)
}

proptest! {
    #[test]
    fn sort_respects_every_dependency((n, edges) in edge_strategy(12)) {
        let journal = Journal::new();
        let (mut seq, units) = acyclic(n, &edges, &journal);

        let order = seq.sorted_units().unwrap();
        prop_assert_eq!(order.len(), units.len());

        let position: HashMap<UnitId, usize> =
            order.iter().enumerate().map(|(i, u)| (*u, i)).collect();
        for unit in units.iter() {
            for (prerequisite, _rule) in seq.dependencies_of(*unit) {
                prop_assert!(position[&prerequisite] < position[unit]);
            }
        }

        // Deterministic: re-sorting after an edit gives the same order.
        seq.play(units[0]);
        prop_assert!(seq.needs_sort());
        prop_assert_eq!(seq.sorted_units().unwrap(), order);
    }

    #[test]
    fn every_unit_starts_exactly_once_per_run((n, edges) in edge_strategy(12)) {
        let journal = Journal::new();
        let (mut seq, _units) = acyclic(n, &edges, &journal);

        for run in 1..=2usize {
            seq.start().unwrap();
            prop_assert!(seq.is_idle());
            for i in 0..n {
                prop_assert_eq!(journal.count(&format!("u{i}"), Call::Start), run);
            }
        }
    }

    #[test]
    fn prerequisites_start_first((n, edges) in edge_strategy(10)) {
        let journal = Journal::new();
        let (mut seq, units) = acyclic(n, &edges, &journal);
        seq.start().unwrap();

        for (i, unit) in units.iter().enumerate() {
            let started = journal.position(&format!("u{i}"), Call::Start).unwrap();
            for (prerequisite, _rule) in seq.dependencies_of(*unit) {
                let before = journal.position(seq.label(prerequisite), Call::Start).unwrap();
                prop_assert!(before < started);
            }
        }
    }

    #[test]
    fn a_back_edge_makes_start_fail_without_side_effects(
        (n, edges) in edge_strategy(8).prop_filter("need two units", |(n, _)| *n >= 2)
    ) {
        let journal = Journal::new();
        let (mut seq, units) = acyclic(n, &edges, &journal);
        seq.play(units[0]).before(units[n - 1]);
        seq.play(units[n - 1]).before(units[0]);

        let result = seq.start();
        prop_assert!(
            matches!(result, Err(SequencerError::CyclicDependency(_))),
            "expected a cycle"
        );
        prop_assert!(journal.entries().is_empty());
        prop_assert!(seq.is_idle());
    }

    #[test]
    fn run_notifies_start_then_end((n, edges) in edge_strategy(8)) {
        let journal = Journal::new();
        let (mut seq, _units) = acyclic(n, &edges, &journal);
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        seq.add_listener(sequencer::listener_fn(move |e| sink.borrow_mut().push(e)));

        seq.start().unwrap();
        prop_assert_eq!(seen.borrow().clone(), vec![Lifecycle::Start, Lifecycle::End]);
    }
}
