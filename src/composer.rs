//! Flow composer aggregate
//!
//! The composer owns the ordered working set of one flow's steps and the
//! session-local pool selection, and applies all composition commands:
//! inserting catalog entries, removing steps, editing sequence hints, and
//! selecting the terminal step. Every command leaves the cross-cutting
//! invariants intact: at most one equipment-linked step, at most one
//! terminal step, unique step keys, and an observed order that is always
//! the sequence comparator applied to the current steps.
//!
//! Commands are synchronous and return the new working set. `add_steps`
//! is the only command with a rejectable precondition; it fails closed.
//! Commands addressing a key that is not in the working set are no-ops,
//! since stale UI event handlers can issue them benignly.

use crate::catalog::ProcessDefinition;
use crate::errors::{FlowError, FlowResult};
use crate::events::{FlowEvent, SequenceUpdated, StepsAdded, StepsRemoved, TerminalAssigned};
use crate::identifiers::{FlowId, PersistedStepId, StepKey};
use crate::persistence::PersistedAssignment;
use crate::step::FlowStep;
use crate::{ordering, terminal};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Marker trait for aggregate roots
///
/// The composer is the consistency boundary for one flow: all working-set
/// changes go through it, and its version counter advances once per
/// applied command.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

/// The composition engine for one flow, edited by one operator session
#[derive(Debug, Clone)]
pub struct FlowComposer {
    flow_id: FlowId,
    flow_code: String,
    /// Working set, always held in comparator order
    steps: Vec<FlowStep>,
    /// Catalog entries available for insertion, in catalog order
    pool: Vec<ProcessDefinition>,
    /// Pool entries currently marked for insertion
    selection: BTreeSet<String>,
    /// Session-local search text over the pool
    search: Option<String>,
    version: u64,
    /// Persisted IDs removed since the last commit, reported on save
    pending_removals: Vec<PersistedStepId>,
    pending_events: Vec<FlowEvent>,
}

impl FlowComposer {
    /// Start composing a new, empty flow
    pub fn new(flow_id: FlowId, flow_code: impl Into<String>) -> Self {
        Self {
            flow_id,
            flow_code: flow_code.into(),
            steps: Vec::new(),
            pool: Vec::new(),
            selection: BTreeSet::new(),
            search: None,
            version: 0,
            pending_removals: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// Resume composition of a flow loaded from the backing store
    ///
    /// Loaded steps are accepted as-is and re-sorted. A flow that already
    /// violates the equipment-linked or terminal limit (possible through a
    /// data-entry error elsewhere) is flagged in the log, never
    /// auto-corrected; `add_steps` keeps enforcing the limit against the
    /// actual count.
    pub fn load(flow_id: FlowId, flow_code: impl Into<String>, mut steps: Vec<FlowStep>) -> Self {
        ordering::sort_steps(&mut steps);

        let linked = steps.iter().filter(|s| s.equipment_linked()).count();
        if linked > 1 {
            warn!(%flow_id, linked, "loaded flow exceeds the equipment-linked limit");
        }
        let terminals = steps.iter().filter(|s| s.is_terminal()).count();
        if terminals > 1 {
            warn!(%flow_id, terminals, "loaded flow has more than one terminal step");
        }

        Self {
            flow_id,
            flow_code: flow_code.into(),
            steps,
            pool: Vec::new(),
            selection: BTreeSet::new(),
            search: None,
            version: 0,
            pending_removals: Vec::new(),
            pending_events: Vec::new(),
        }
    }

    /// The owning flow's code
    pub fn flow_code(&self) -> &str {
        &self.flow_code
    }

    /// The current working set, in comparator order
    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    /// The loaded catalog pool
    pub fn pool(&self) -> &[ProcessDefinition] {
        &self.pool
    }

    /// Pool entries currently selected for insertion
    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selection
    }

    /// Session-local search text over the pool
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Set the session-local search text
    pub fn set_search(&mut self, search: Option<String>) {
        self.search = search;
    }

    /// Replace the catalog pool, discarding any selection into the old one
    pub fn set_pool(&mut self, definitions: Vec<ProcessDefinition>) {
        self.pool = definitions;
        self.selection.clear();
    }

    /// Mark a pool entry as selected; false when the code is not in the pool
    pub fn select(&mut self, code: &str) -> bool {
        if self.pool.iter().any(|d| d.code == code) {
            self.selection.insert(code.to_string());
            true
        } else {
            false
        }
    }

    /// Unmark a pool entry
    pub fn deselect(&mut self, code: &str) -> bool {
        self.selection.remove(code)
    }

    /// Number of equipment-linked steps currently in the working set
    pub fn equipment_linked_count(&self) -> usize {
        self.steps.iter().filter(|s| s.equipment_linked()).count()
    }

    /// The flow's terminal step, if one has been selected
    pub fn terminal_step(&self) -> Option<&FlowStep> {
        self.steps.iter().find(|s| s.is_terminal())
    }

    /// Insert the currently selected pool entries into the flow
    pub fn add_selected(&mut self) -> FlowResult<&[FlowStep]> {
        let codes = self.selection.clone();
        self.add_steps(&codes)
    }

    /// Insert catalog entries into the flow by process code
    ///
    /// Candidates are the given codes that are present in the pool and not
    /// already in the flow. If the equipment-linked steps already present
    /// plus the linked candidates would exceed one, the whole insertion is
    /// rejected and the working set is unchanged. Otherwise every
    /// candidate becomes a new step with an ephemeral identity, no
    /// sequence, and no terminal flag, and the pool selection is cleared.
    pub fn add_steps(&mut self, codes: &BTreeSet<String>) -> FlowResult<&[FlowStep]> {
        let candidates: Vec<ProcessDefinition> = self
            .pool
            .iter()
            .filter(|d| codes.contains(&d.code))
            .filter(|d| !self.steps.iter().any(|s| s.process_code() == d.code))
            .cloned()
            .collect();

        if candidates.is_empty() {
            // Still a successful command: the selection is consumed even
            // when every code was already in the flow or not in the pool.
            self.selection.clear();
            debug!(flow_id = %self.flow_id, "add_steps ignored: no insertable candidates");
            return Ok(&self.steps);
        }

        let existing = self.equipment_linked_count();
        let incoming = candidates.iter().filter(|d| d.equipment_integrated).count();
        if existing + incoming > 1 {
            warn!(
                flow_id = %self.flow_id,
                existing,
                incoming,
                "add_steps rejected: equipment-linked limit exceeded"
            );
            return Err(FlowError::EquipmentLinkExceeded {
                existing,
                candidates: incoming,
            });
        }

        let mut keys = Vec::with_capacity(candidates.len());
        for definition in &candidates {
            let step = FlowStep::from_definition(self.flow_id, &self.flow_code, definition);
            keys.push(step.key());
            self.steps.push(step);
        }
        ordering::sort_steps(&mut self.steps);
        self.selection.clear();

        debug!(flow_id = %self.flow_id, added = keys.len(), "steps added");
        self.pending_events.push(FlowEvent::StepsAdded(StepsAdded {
            flow_id: self.flow_id,
            keys,
            occurred_at: Utc::now(),
        }));
        self.increment_version();
        Ok(&self.steps)
    }

    /// Remove every step whose key is in the set
    ///
    /// Unknown keys are ignored. Removed persisted steps are remembered
    /// for deletion reporting at the next commit. If the terminal step is
    /// removed, no step remains terminal; the operator must select a new
    /// one explicitly.
    pub fn remove_steps(&mut self, keys: &[StepKey]) -> &[FlowStep] {
        let drained: Vec<FlowStep> = self.steps.drain(..).collect();
        let (removed, kept): (Vec<FlowStep>, Vec<FlowStep>) = drained
            .into_iter()
            .partition(|s| keys.iter().any(|k| s.matches(k)));
        self.steps = kept;

        if removed.is_empty() {
            debug!(flow_id = %self.flow_id, "remove_steps ignored: no keys matched");
            return &self.steps;
        }

        let removed_keys: Vec<StepKey> = removed.iter().map(|s| s.key()).collect();
        for step in &removed {
            if let Some(id) = step.persisted_id() {
                self.pending_removals.push(id);
            }
        }

        debug!(flow_id = %self.flow_id, removed = removed_keys.len(), "steps removed");
        self.pending_events.push(FlowEvent::StepsRemoved(StepsRemoved {
            flow_id: self.flow_id,
            keys: removed_keys,
            occurred_at: Utc::now(),
        }));
        self.increment_version();
        &self.steps
    }

    /// Edit one step's sequence hint and immediately re-sort the flow
    ///
    /// A key that is not in the working set is a no-op.
    pub fn update_sequence(&mut self, key: &StepKey, sequence: Option<String>) -> &[FlowStep] {
        let Some(pos) = self.steps.iter().position(|s| s.matches(key)) else {
            debug!(flow_id = %self.flow_id, %key, "update_sequence ignored: step not in working set");
            return &self.steps;
        };

        self.steps[pos].set_sequence(sequence.clone());
        ordering::sort_steps(&mut self.steps);

        debug!(flow_id = %self.flow_id, %key, ?sequence, "sequence updated");
        self.pending_events.push(FlowEvent::SequenceUpdated(SequenceUpdated {
            flow_id: self.flow_id,
            key: *key,
            sequence,
            occurred_at: Utc::now(),
        }));
        self.increment_version();
        &self.steps
    }

    /// Make the target step the flow's sole terminal step
    ///
    /// Applied as one atomic pass over the working set; idempotent. A key
    /// that is not in the working set is a no-op.
    pub fn set_terminal(&mut self, key: &StepKey) -> &[FlowStep] {
        if !terminal::assign_terminal(&mut self.steps, key) {
            debug!(flow_id = %self.flow_id, %key, "set_terminal ignored: step not in working set");
            return &self.steps;
        }

        debug!(flow_id = %self.flow_id, %key, "terminal step assigned");
        self.pending_events.push(FlowEvent::TerminalAssigned(TerminalAssigned {
            flow_id: self.flow_id,
            key: *key,
            occurred_at: Utc::now(),
        }));
        self.increment_version();
        &self.steps
    }

    /// Reset the session-local selection and search state
    ///
    /// Steps already in the working set are untouched.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.search = None;
    }

    /// Merge persisted IDs assigned by the backing store after a commit
    ///
    /// Every assignment must name an ephemeral ID currently in the working
    /// set; existing persisted IDs are never replaced. Fails closed: if
    /// any assignment fails to resolve, none is applied.
    pub fn merge_persisted(&mut self, assignments: &[PersistedAssignment]) -> FlowResult<()> {
        let mut positions = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let Some(pos) = self
                .steps
                .iter()
                .position(|s| s.ephemeral_id() == assignment.ephemeral_id)
            else {
                return Err(FlowError::StepNotFound {
                    key: assignment.ephemeral_id.into(),
                });
            };
            positions.push(pos);
        }
        for (pos, assignment) in positions.into_iter().zip(assignments) {
            self.steps[pos].mark_persisted(assignment.persisted_id);
        }

        if !assignments.is_empty() {
            debug!(flow_id = %self.flow_id, merged = assignments.len(), "persisted identities merged");
            self.increment_version();
        }
        Ok(())
    }

    /// Drain the persisted IDs removed since the last commit
    pub fn take_pending_removals(&mut self) -> Vec<PersistedStepId> {
        std::mem::take(&mut self.pending_removals)
    }

    /// Drain the events recorded by commands since the last drain
    pub fn take_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl AggregateRoot for FlowComposer {
    type Id = FlowId;

    fn id(&self) -> Self::Id {
        self.flow_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn increment_version(&mut self) {
        self.version += 1;
    }
}
