//! Sequence ordering for the working set
//!
//! The externally observed order of a flow is always the result of this
//! comparator: numerically sequenced steps ascend by value, unsequenced
//! steps follow in their original relative order. Callers must use a
//! stable sort (`sort_by` is), since two unsequenced steps compare equal.

use crate::step::FlowStep;
use std::cmp::Ordering;

/// Parse a step's sequence as a number, treating empty or unparseable
/// values as "unsequenced"
pub fn sequence_key(step: &FlowStep) -> Option<f64> {
    step.sequence()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
}

/// Compare two steps by sequence
///
/// Numeric sequences ascend; a sequenced step sorts before an unsequenced
/// one; two unsequenced steps compare equal and keep their input order
/// under a stable sort.
pub fn compare(a: &FlowStep, b: &FlowStep) -> Ordering {
    match (sequence_key(a), sequence_key(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Re-derive the full order of the working set
pub fn sort_steps(steps: &mut [FlowStep]) {
    steps.sort_by(compare);
}
