//! Identifier types for flows and flow steps

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Flow ID - identifies the process flow that owns a working set of steps
///
/// Flows are aggregate roots: a composer instance edits exactly one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(Uuid);

impl FlowId {
    /// Create a new random flow ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FlowId> for Uuid {
    fn from(id: FlowId) -> Self {
        id.0
    }
}

impl From<&FlowId> for Uuid {
    fn from(id: &FlowId) -> Self {
        id.0
    }
}

/// Ephemeral step ID - generated locally when a step enters the working set
///
/// Ephemeral IDs identify steps that have not been committed to the backing
/// store yet. They are only meaningful within one editing session and are
/// superseded by a [`PersistedStepId`] after a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EphemeralStepId(Uuid);

impl EphemeralStepId {
    /// Create a new random ephemeral step ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EphemeralStepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EphemeralStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EphemeralStepId> for Uuid {
    fn from(id: EphemeralStepId) -> Self {
        id.0
    }
}

/// Persisted step ID - assigned by the backing store once a step is committed
///
/// The composer never generates these; it only preserves them across commands
/// and merges them in after a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersistedStepId(i64);

impl PersistedStepId {
    /// Create from a backing-store row ID
    pub fn from_raw(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying row ID
    pub fn as_raw(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersistedStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PersistedStepId> for i64 {
    fn from(id: PersistedStepId) -> Self {
        id.0
    }
}

/// The stable key callers use to address a step in the working set
///
/// A step is keyed by its persisted ID when it has one, otherwise by its
/// ephemeral ID. All composer commands that target a step (removal, sequence
/// edits, terminal selection) take a `StepKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKey {
    /// Step committed to the backing store
    Persisted(PersistedStepId),
    /// Step that exists only in the current editing session
    Ephemeral(EphemeralStepId),
}

impl StepKey {
    /// Whether this key refers to a committed step
    pub fn is_persisted(&self) -> bool {
        matches!(self, StepKey::Persisted(_))
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKey::Persisted(id) => write!(f, "persisted:{id}"),
            StepKey::Ephemeral(id) => write!(f, "ephemeral:{id}"),
        }
    }
}

impl From<PersistedStepId> for StepKey {
    fn from(id: PersistedStepId) -> Self {
        StepKey::Persisted(id)
    }
}

impl From<EphemeralStepId> for StepKey {
    fn from(id: EphemeralStepId) -> Self {
        StepKey::Ephemeral(id)
    }
}
