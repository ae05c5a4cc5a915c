//! Property tests for the flow composition invariants
//!
//! The equipment-linked and terminal limits must hold after every command,
//! for arbitrary command sequences, not merely at commit time.

use process_flow::{FlowComposer, FlowId, ProcessDefinition};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn catalog(flags: &[bool]) -> Vec<ProcessDefinition> {
    flags
        .iter()
        .enumerate()
        .map(|(i, &linked)| ProcessDefinition::new(format!("P{i}"), format!("Process {i}"), linked))
        .collect()
}

proptest! {
    /// Invariant 1: no sequence of add_steps batches ever yields more than
    /// one equipment-linked step, and every rejection leaves the working
    /// set unchanged.
    #[test]
    fn equipment_linked_never_exceeds_one(
        flags in prop::collection::vec(any::<bool>(), 1..12),
        batches in prop::collection::vec(
            prop::collection::vec(any::<prop::sample::Index>(), 1..4),
            1..8,
        ),
    ) {
        let mut composer = FlowComposer::new(FlowId::new(), "F");
        composer.set_pool(catalog(&flags));

        for batch in &batches {
            let codes: BTreeSet<String> = batch
                .iter()
                .map(|ix| format!("P{}", ix.index(flags.len())))
                .collect();

            let before: Vec<String> = composer
                .steps()
                .iter()
                .map(|s| s.process_code().to_string())
                .collect();

            if composer.add_steps(&codes).map(|steps| steps.len()).is_err() {
                let after: Vec<String> = composer
                    .steps()
                    .iter()
                    .map(|s| s.process_code().to_string())
                    .collect();
                prop_assert_eq!(&before, &after, "rejection must not mutate the working set");
            }

            prop_assert!(composer.equipment_linked_count() <= 1);
        }
    }

    /// Invariant 2: after any sequence of terminal selections, exactly the
    /// last selected step is terminal and no other.
    #[test]
    fn terminal_step_is_exclusive(
        step_count in 1usize..10,
        targets in prop::collection::vec(any::<prop::sample::Index>(), 1..12),
    ) {
        let mut composer = FlowComposer::new(FlowId::new(), "F");
        composer.set_pool(catalog(&vec![false; step_count]));

        let codes: BTreeSet<String> = (0..step_count).map(|i| format!("P{i}")).collect();
        composer.add_steps(&codes).map(|steps| steps.len()).unwrap();

        for target in &targets {
            let key = composer.steps()[target.index(step_count)].key();
            composer.set_terminal(&key);

            let terminals: Vec<_> = composer
                .steps()
                .iter()
                .filter(|s| s.is_terminal())
                .map(|s| s.key())
                .collect();
            prop_assert_eq!(terminals, vec![key]);
        }
    }

    /// Invariant 3: step keys stay unique through adds, sequence edits, and
    /// removals.
    #[test]
    fn step_keys_stay_unique(
        batches in prop::collection::vec(
            prop::collection::vec(any::<prop::sample::Index>(), 1..4),
            1..6,
        ),
        edits in prop::collection::vec((any::<prop::sample::Index>(), 0u32..100), 0..6),
    ) {
        let mut composer = FlowComposer::new(FlowId::new(), "F");
        composer.set_pool(catalog(&vec![false; 10]));

        for batch in &batches {
            let codes: BTreeSet<String> = batch
                .iter()
                .map(|ix| format!("P{}", ix.index(10)))
                .collect();
            composer.add_steps(&codes).map(|steps| steps.len()).unwrap();
        }

        for (target, sequence) in &edits {
            if composer.steps().is_empty() {
                break;
            }
            let key = composer.steps()[target.index(composer.steps().len())].key();
            composer.update_sequence(&key, Some(sequence.to_string()));
        }

        let keys: Vec<_> = composer.steps().iter().map(|s| s.key()).collect();
        let unique: std::collections::HashSet<_> = keys.iter().copied().collect();
        prop_assert_eq!(keys.len(), unique.len());
    }
}

/// The catalog scenario from the composition rules: P1 linked, P2 not,
/// P3 linked. Adding P1 then P2 succeeds; adding P3 is rejected whole.
#[test]
fn equipment_link_scenario() {
    use pretty_assertions::assert_eq;

    let mut composer = FlowComposer::new(FlowId::new(), "F");
    composer.set_pool(vec![
        ProcessDefinition::new("P1", "Press", true),
        ProcessDefinition::new("P2", "Polish", false),
        ProcessDefinition::new("P3", "Plasma cut", true),
    ]);

    let one: BTreeSet<String> = [String::from("P1")].into();
    let two: BTreeSet<String> = [String::from("P2")].into();
    let three: BTreeSet<String> = [String::from("P3")].into();

    assert!(composer.add_steps(&one).is_ok());
    assert!(composer.add_steps(&two).is_ok());
    assert!(composer.add_steps(&three).is_err());

    let codes: Vec<&str> = composer.steps().iter().map(|s| s.process_code()).collect();
    assert_eq!(codes, vec!["P1", "P2"]);
}
