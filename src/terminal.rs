//! Exclusive terminal-step selection
//!
//! A flow has at most one terminal step. Selecting a terminal is an
//! exclusive-choice transition: the target becomes terminal and every
//! other step becomes non-terminal in a single in-place pass, so no
//! observer of the working set can ever see two terminals at once.

use crate::identifiers::StepKey;
use crate::step::FlowStep;

/// Make the target step the flow's sole terminal step
///
/// Idempotent; returns `false` without touching any step when the target
/// is not in the working set.
pub fn assign_terminal(steps: &mut [FlowStep], target: &StepKey) -> bool {
    if !steps.iter().any(|s| s.matches(target)) {
        return false;
    }
    for step in steps.iter_mut() {
        let is_target = step.matches(target);
        step.set_terminal_flag(is_target);
    }
    true
}
