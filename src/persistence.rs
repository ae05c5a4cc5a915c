//! Persistence contract for committing flows
//!
//! The composer never talks to a store directly; it hands its working set
//! to a [`FlowRepository`] and merges the returned persisted IDs back in.
//! Removals of already-persisted steps are reported separately so the
//! store can delete them.

use crate::errors::{FlowError, FlowResult};
use crate::identifiers::{EphemeralStepId, FlowId, PersistedStepId};
use crate::step::FlowStep;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// Persisted ID assigned to one newly created step during a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAssignment {
    /// The step's session-local identity at commit time
    pub ephemeral_id: EphemeralStepId,
    /// The identity the backing store assigned
    pub persisted_id: PersistedStepId,
}

/// Write contract over the flow backing store
#[async_trait]
pub trait FlowRepository: Send + Sync {
    /// Commit the flow's current working set
    ///
    /// Returns a persisted-ID assignment for every step that was newly
    /// created in this session. On error the caller's working set must be
    /// treated as untouched; there is nothing to roll back.
    async fn commit_flow(
        &self,
        flow_id: FlowId,
        steps: &[FlowStep],
    ) -> FlowResult<Vec<PersistedAssignment>>;

    /// Delete previously persisted steps that were removed from the flow
    async fn delete_steps(&self, flow_id: FlowId, ids: &[PersistedStepId]) -> FlowResult<()>;
}

/// In-memory repository for tests and embedding
#[derive(Clone, Default)]
pub struct InMemoryFlowRepository {
    committed: Arc<RwLock<HashMap<FlowId, Vec<FlowStep>>>>,
    next_id: Arc<AtomicI64>,
    fail_commits: Arc<AtomicBool>,
}

impl InMemoryFlowRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self {
            committed: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            fail_commits: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make subsequent commits fail, for persistence-failure tests
    pub fn set_fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// The last committed snapshot of a flow, if any
    pub fn committed_steps(&self, flow_id: FlowId) -> Option<Vec<FlowStep>> {
        self.committed.read().unwrap().get(&flow_id).cloned()
    }
}

#[async_trait]
impl FlowRepository for InMemoryFlowRepository {
    async fn commit_flow(
        &self,
        flow_id: FlowId,
        steps: &[FlowStep],
    ) -> FlowResult<Vec<PersistedAssignment>> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(FlowError::Persistence(
                "commit rejected by backing store".to_string(),
            ));
        }

        let mut snapshot: Vec<FlowStep> = steps.to_vec();
        let mut assignments = Vec::new();
        for step in snapshot.iter_mut() {
            if step.persisted_id().is_none() {
                let id = PersistedStepId::from_raw(self.next_id.fetch_add(1, Ordering::SeqCst));
                assignments.push(PersistedAssignment {
                    ephemeral_id: step.ephemeral_id(),
                    persisted_id: id,
                });
                step.mark_persisted(id);
            }
        }

        self.committed.write().unwrap().insert(flow_id, snapshot);
        Ok(assignments)
    }

    async fn delete_steps(&self, flow_id: FlowId, ids: &[PersistedStepId]) -> FlowResult<()> {
        let mut committed = self.committed.write().unwrap();
        if let Some(steps) = committed.get_mut(&flow_id) {
            steps.retain(|s| match s.persisted_id() {
                Some(id) => !ids.contains(&id),
                None => true,
            });
        }
        Ok(())
    }
}
