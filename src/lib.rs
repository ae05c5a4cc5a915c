//! # Process Flow
//!
//! Process-flow composition engine for manufacturing-execution systems.
//!
//! A process flow is an ordered chain of manufacturing steps assigned to a
//! workplace. This crate provides the building blocks for assembling one
//! out of a catalog of process definitions:
//! - **FlowComposer**: the aggregate owning the ordered working set of
//!   steps, applying insert/remove/reorder/terminal commands
//! - **Sequence ordering**: numerically sequenced steps ascend, unsequenced
//!   steps keep their relative insertion order
//! - **Terminal selection**: exclusive-choice transition keeping at most
//!   one terminal step, applied atomically
//! - **Dual identity**: steps carry a session-local ephemeral ID until the
//!   backing store assigns a persisted ID, without ever invalidating the
//!   key callers hold
//! - **Collaborator boundaries**: read-only catalog, commit/delete
//!   repository, and operator notification traits, with in-memory
//!   implementations for tests and embedding
//!
//! ## Invariants
//!
//! After every composer command, not merely at commit time:
//! 1. At most one step in a flow is equipment-linked
//! 2. At most one step in a flow is terminal
//! 3. Step keys are unique within a flow's working set
//! 4. The observed order is always the sequence comparator applied to the
//!    current steps
//!
//! ## Example
//!
//! ```rust
//! use process_flow::{FlowComposer, FlowId, ProcessDefinition};
//! use std::collections::BTreeSet;
//!
//! let mut composer = FlowComposer::new(FlowId::new(), "FLOW-01");
//! composer.set_pool(vec![
//!     ProcessDefinition::new("CUT", "Cutting", false),
//!     ProcessDefinition::new("WELD", "Welding", true),
//! ]);
//!
//! let codes: BTreeSet<String> = ["CUT", "WELD"].iter().map(|c| c.to_string()).collect();
//! composer.add_steps(&codes).expect("within the equipment-linked limit");
//!
//! let last = composer.steps().last().unwrap().key();
//! composer.set_terminal(&last);
//! assert!(composer.terminal_step().is_some());
//! ```

#![warn(missing_docs)]

mod catalog;
mod composer;
mod errors;
mod events;
mod identifiers;
mod notification;
mod ordering;
mod persistence;
mod session;
mod step;
mod terminal;

// Re-export core types
pub use catalog::{
    CatalogFilter, CatalogPage, InMemoryProcessCatalog, ProcessCatalog, ProcessDefinition,
};
pub use composer::{AggregateRoot, FlowComposer};
pub use errors::{FlowError, FlowResult};
pub use events::{
    DomainEvent, FlowEvent, SequenceUpdated, StepsAdded, StepsRemoved, TerminalAssigned,
};
pub use identifiers::{EphemeralStepId, FlowId, PersistedStepId, StepKey};
pub use notification::{LogNotifier, Notifier, RecordingNotifier, Severity};
pub use ordering::{compare, sequence_key, sort_steps};
pub use persistence::{FlowRepository, InMemoryFlowRepository, PersistedAssignment};
pub use session::FlowEditingSession;
pub use step::FlowStep;
pub use terminal::assign_terminal;
