//! Flow step entity
//!
//! A flow step is one instance of a process definition placed into a
//! specific flow, carrying flow-local attributes (sequence, terminal flag)
//! plus a dual identity: an ephemeral ID assigned at insertion and an
//! optional persisted ID assigned by the backing store after a commit.

use crate::catalog::ProcessDefinition;
use crate::identifiers::{EphemeralStepId, FlowId, PersistedStepId, StepKey};
use serde::{Deserialize, Serialize};

/// One process assigned into a specific flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowStep {
    ephemeral_id: EphemeralStepId,
    persisted_id: Option<PersistedStepId>,
    flow_id: FlowId,
    flow_code: String,
    process_code: String,
    process_name: String,
    equipment_linked: bool,
    sequence: Option<String>,
    is_terminal: bool,
}

impl FlowStep {
    /// Create a step from a catalog definition at insertion time
    ///
    /// The definition's fields are copied, not referenced: later edits to
    /// the catalog entry do not change this step. A fresh ephemeral ID is
    /// assigned; the step has no sequence and is not terminal.
    pub(crate) fn from_definition(
        flow_id: FlowId,
        flow_code: &str,
        definition: &ProcessDefinition,
    ) -> Self {
        Self {
            ephemeral_id: EphemeralStepId::new(),
            persisted_id: None,
            flow_id,
            flow_code: flow_code.to_string(),
            process_code: definition.code.clone(),
            process_name: definition.name.clone(),
            equipment_linked: definition.equipment_integrated,
            sequence: None,
            is_terminal: false,
        }
    }

    /// Reconstruct a step previously committed to the backing store
    ///
    /// Used when loading an existing flow into a composer. A fresh
    /// ephemeral ID is still assigned, but the persisted ID is the
    /// authoritative key from the moment of construction.
    #[allow(clippy::too_many_arguments)]
    pub fn restored(
        persisted_id: PersistedStepId,
        flow_id: FlowId,
        flow_code: impl Into<String>,
        process_code: impl Into<String>,
        process_name: impl Into<String>,
        equipment_linked: bool,
        sequence: Option<String>,
        is_terminal: bool,
    ) -> Self {
        Self {
            ephemeral_id: EphemeralStepId::new(),
            persisted_id: Some(persisted_id),
            flow_id,
            flow_code: flow_code.into(),
            process_code: process_code.into(),
            process_name: process_name.into(),
            equipment_linked,
            sequence,
            is_terminal,
        }
    }

    /// The stable key for this step: persisted ID when present, else ephemeral
    pub fn key(&self) -> StepKey {
        match self.persisted_id {
            Some(id) => StepKey::Persisted(id),
            None => StepKey::Ephemeral(self.ephemeral_id),
        }
    }

    /// Whether the given key addresses this step
    ///
    /// Matches either identity, so a stale ephemeral key from a UI handler
    /// still resolves after the step has been persisted.
    pub fn matches(&self, key: &StepKey) -> bool {
        match key {
            StepKey::Persisted(id) => self.persisted_id == Some(*id),
            StepKey::Ephemeral(id) => self.ephemeral_id == *id,
        }
    }

    /// The ephemeral ID assigned at insertion
    pub fn ephemeral_id(&self) -> EphemeralStepId {
        self.ephemeral_id
    }

    /// The persisted ID, once the backing store has assigned one
    pub fn persisted_id(&self) -> Option<PersistedStepId> {
        self.persisted_id
    }

    /// The owning flow
    pub fn flow_id(&self) -> FlowId {
        self.flow_id
    }

    /// The owning flow's code
    pub fn flow_code(&self) -> &str {
        &self.flow_code
    }

    /// Process code copied from the source definition at insertion
    pub fn process_code(&self) -> &str {
        &self.process_code
    }

    /// Process name copied from the source definition at insertion
    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// Whether this step is equipment-linked
    pub fn equipment_linked(&self) -> bool {
        self.equipment_linked
    }

    /// Operator-set position hint; absent until edited
    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// Whether this step marks the end of the flow
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Record the persisted ID assigned by the backing store
    ///
    /// Idempotent: an already-persisted step keeps its original ID.
    pub(crate) fn mark_persisted(&mut self, id: PersistedStepId) {
        if self.persisted_id.is_none() {
            self.persisted_id = Some(id);
        }
    }

    pub(crate) fn set_sequence(&mut self, sequence: Option<String>) {
        self.sequence = sequence;
    }

    pub(crate) fn set_terminal_flag(&mut self, terminal: bool) {
        self.is_terminal = terminal;
    }
}
