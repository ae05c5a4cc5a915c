//! Error types for flow composition operations

use crate::identifiers::StepKey;
use thiserror::Error;

/// Errors that can occur while composing or persisting a process flow
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    /// The equipment-linked limit would be exceeded
    ///
    /// Raised only by `add_steps`; the working set is left unchanged.
    #[error("equipment-linked limit exceeded: flow already has {existing} linked step(s), selection would add {candidates} more")]
    EquipmentLinkExceeded {
        /// Equipment-linked steps already in the working set
        existing: usize,
        /// Equipment-linked steps among the selected candidates
        candidates: usize,
    },

    /// A collaborator referenced a step that is not in the working set
    ///
    /// Commands targeting absent keys are no-ops and never return this;
    /// it is reserved for collaborator misuse, e.g. a persisted-ID
    /// assignment naming an unknown ephemeral ID.
    #[error("flow step not found: {key}")]
    StepNotFound {
        /// Key that failed to resolve
        key: StepKey,
    },

    /// The persistence collaborator failed
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The catalog collaborator failed
    #[error("catalog error: {0}")]
    Catalog(String),
}

/// Result type for flow composition operations
pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// Check if this is a command rejection (recoverable, working set unchanged)
    pub fn is_rejection(&self) -> bool {
        matches!(self, FlowError::EquipmentLinkExceeded { .. })
    }

    /// Check if this error originates in the persistence collaborator
    pub fn is_persistence(&self) -> bool {
        matches!(self, FlowError::Persistence(_))
    }
}
