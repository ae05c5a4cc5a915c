//! Ordering, identity-stability, and idempotence tests
//!
//! The working set's observed order is always the sequence comparator
//! applied to the current steps: numeric sequences ascend, unsequenced
//! steps follow in their original relative order.

use pretty_assertions::assert_eq;
use process_flow::{FlowComposer, FlowId, ProcessDefinition, StepKey};
use std::collections::BTreeSet;
use test_case::test_case;

/// Build a composer whose working set contains the given steps, inserted
/// in array order, then apply the given sequence edits.
fn composed(steps: &[(&str, Option<&str>)]) -> FlowComposer {
    let mut composer = FlowComposer::new(FlowId::new(), "F");
    composer.set_pool(
        steps
            .iter()
            .enumerate()
            .map(|(i, (code, _))| {
                ProcessDefinition::new(*code, format!("Process {code}"), false)
                    .with_sort_order(i as u32)
            })
            .collect(),
    );

    let codes: BTreeSet<String> = steps.iter().map(|(code, _)| code.to_string()).collect();
    composer
        .add_steps(&codes)
        .map(|steps| steps.len())
        .expect("no equipment-linked candidates");

    for (code, sequence) in steps {
        if let Some(sequence) = sequence {
            let key = key_of(&composer, code);
            composer.update_sequence(&key, Some(sequence.to_string()));
        }
    }
    composer
}

fn key_of(composer: &FlowComposer, code: &str) -> StepKey {
    composer
        .steps()
        .iter()
        .find(|s| s.process_code() == code)
        .map(|s| s.key())
        .expect("step present")
}

fn observed_order(composer: &FlowComposer) -> Vec<String> {
    composer
        .steps()
        .iter()
        .map(|s| s.process_code().to_string())
        .collect()
}

#[test_case(
    &[("A", Some("2")), ("B", None), ("C", Some("1")), ("D", None)],
    &["C", "A", "B", "D"];
    "numeric ascending then unsequenced in insertion order"
)]
#[test_case(
    &[("A", None), ("B", None), ("C", None)],
    &["A", "B", "C"];
    "all unsequenced keep insertion order"
)]
#[test_case(
    &[("A", Some("10")), ("B", Some("2"))],
    &["B", "A"];
    "sequences compare numerically not lexicographically"
)]
#[test_case(
    &[("A", Some("not-a-number")), ("B", Some("1"))],
    &["B", "A"];
    "unparseable sequence sorts as unsequenced"
)]
#[test_case(
    &[("A", Some("1.5")), ("B", Some("1")), ("C", Some("2"))],
    &["B", "A", "C"];
    "fractional sequences interleave"
)]
fn working_set_order(steps: &[(&str, Option<&str>)], expected: &[&str]) {
    let composer = composed(steps);
    assert_eq!(observed_order(&composer), expected);
}

/// Resequencing scenario: both steps start unsequenced; giving X a
/// sequence keeps it first, then giving Y a smaller one moves Y ahead.
#[test]
fn resequencing_two_steps() {
    let mut composer = composed(&[("X", None), ("Y", None)]);

    let x = key_of(&composer, "X");
    let y = key_of(&composer, "Y");

    composer.update_sequence(&x, Some("1".to_string()));
    assert_eq!(observed_order(&composer), vec!["X", "Y"]);

    composer.update_sequence(&y, Some("0".to_string()));
    assert_eq!(observed_order(&composer), vec!["Y", "X"]);
}

/// A step's key never changes when commands target other steps.
#[test]
fn identity_stable_across_unrelated_commands() {
    let mut composer = composed(&[("A", None), ("B", None), ("C", None)]);

    let a = key_of(&composer, "A");
    let b = key_of(&composer, "B");
    let c = key_of(&composer, "C");

    composer.update_sequence(&a, Some("5".to_string()));
    composer.set_terminal(&c);
    composer.update_sequence(&c, Some("1".to_string()));

    assert_eq!(key_of(&composer, "A"), a);
    assert_eq!(key_of(&composer, "B"), b);
    assert_eq!(key_of(&composer, "C"), c);
}

/// Selecting the same terminal twice yields the same working set as once.
#[test]
fn set_terminal_is_idempotent() {
    let mut composer = composed(&[("A", None), ("B", None)]);
    let b = key_of(&composer, "B");

    composer.set_terminal(&b);
    let once = composer.steps().to_vec();
    composer.set_terminal(&b);

    assert_eq!(composer.steps(), &once[..]);
}

/// Clearing a sequence returns the step to the unsequenced tail.
#[test]
fn clearing_a_sequence() {
    let mut composer = composed(&[("A", Some("1")), ("B", Some("2")), ("C", None)]);
    assert_eq!(observed_order(&composer), vec!["A", "B", "C"]);

    let a = key_of(&composer, "A");
    composer.update_sequence(&a, None);

    // A becomes unsequenced and follows the remaining sequenced step; the
    // stable sort keeps it ahead of C, which it already preceded.
    assert_eq!(observed_order(&composer), vec!["B", "A", "C"]);
}
