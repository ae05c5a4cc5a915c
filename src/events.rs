//! Domain events emitted by flow composition commands
//!
//! Events are facts about what happened to a flow's working set. The
//! composer records them as commands apply; the editing session (or any
//! embedding caller) drains them for read models or audit trails. They
//! are informational, not event-sourcing: the working set itself is the
//! source of truth.

use crate::identifiers::{FlowId, StepKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Base trait for domain events
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Get the aggregate ID this event relates to
    fn aggregate_id(&self) -> Uuid;

    /// Get the event type name
    fn event_type(&self) -> &'static str;
}

/// Steps were added to the working set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsAdded {
    /// The flow whose working set changed
    pub flow_id: FlowId,
    /// Keys of the newly created steps
    pub keys: Vec<StepKey>,
    /// When the command applied
    pub occurred_at: DateTime<Utc>,
}

/// Steps were removed from the working set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsRemoved {
    /// The flow whose working set changed
    pub flow_id: FlowId,
    /// Keys of the removed steps
    pub keys: Vec<StepKey>,
    /// When the command applied
    pub occurred_at: DateTime<Utc>,
}

/// A step's sequence hint was edited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceUpdated {
    /// The flow whose working set changed
    pub flow_id: FlowId,
    /// The edited step
    pub key: StepKey,
    /// The new sequence value, `None` when cleared
    pub sequence: Option<String>,
    /// When the command applied
    pub occurred_at: DateTime<Utc>,
}

/// A step became the flow's sole terminal step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalAssigned {
    /// The flow whose working set changed
    pub flow_id: FlowId,
    /// The step now marked terminal
    pub key: StepKey,
    /// When the command applied
    pub occurred_at: DateTime<Utc>,
}

/// Enum wrapper for all flow composition events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FlowEvent {
    /// Steps were added to the working set
    StepsAdded(StepsAdded),
    /// Steps were removed from the working set
    StepsRemoved(StepsRemoved),
    /// A step's sequence hint was edited
    SequenceUpdated(SequenceUpdated),
    /// A step became the sole terminal step
    TerminalAssigned(TerminalAssigned),
}

impl FlowEvent {
    /// The flow this event belongs to
    pub fn flow_id(&self) -> FlowId {
        match self {
            FlowEvent::StepsAdded(e) => e.flow_id,
            FlowEvent::StepsRemoved(e) => e.flow_id,
            FlowEvent::SequenceUpdated(e) => e.flow_id,
            FlowEvent::TerminalAssigned(e) => e.flow_id,
        }
    }
}

impl DomainEvent for FlowEvent {
    fn aggregate_id(&self) -> Uuid {
        self.flow_id().into()
    }

    fn event_type(&self) -> &'static str {
        match self {
            FlowEvent::StepsAdded(_) => "StepsAdded",
            FlowEvent::StepsRemoved(_) => "StepsRemoved",
            FlowEvent::SequenceUpdated(_) => "SequenceUpdated",
            FlowEvent::TerminalAssigned(_) => "TerminalAssigned",
        }
    }
}
